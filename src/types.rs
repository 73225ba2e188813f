//! Common types used throughout the editor core.

use serde::{Deserialize, Serialize};

/// What kind of file a document is. The kind decides where the file lives in
/// the project tree and whether it can be edited at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A Move source file under `sources/`.
    Source,
    /// A generated project manifest (`Move.toml`).
    Config,
    /// A compiler artifact under `build/`.
    Build,
}

/// One named file in the workspace.
///
/// The `name` is the sole identity (a `dir/name` convention encodes the
/// path); renaming is modeled as delete+create, never as mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    content: String,
    kind: FileKind,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>, kind: FileKind) -> Self {
        Self { name: name.into(), content: content.into(), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Only plain source files accept edits; the manifest and build
    /// artifacts are generated elsewhere.
    pub fn read_only(&self) -> bool {
        self.kind != FileKind::Source
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }
}

/// A position in the document, as presented to the user.
///
/// Both fields are **1-based** and count characters, not bytes. Derived from
/// a linear char offset by counting newlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

/// The style classes the tokenizer can assign to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Attribute,
    DocComment,
    Comment,
    ByteString,
    Str,
    Address,
    Number,
    FrameworkPath,
    ModulePath,
    Builtin,
    Visibility,
    Keyword,
    Primitive,
    TypeParams,
    Operator,
}

impl Style {
    /// Stable class name for embedding in a styled display surface.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Attribute => "syn-attribute",
            Self::DocComment => "syn-doc-comment",
            Self::Comment => "syn-comment",
            Self::ByteString => "syn-byte-string",
            Self::Str => "syn-string",
            Self::Address => "syn-address",
            Self::Number => "syn-number",
            Self::FrameworkPath => "syn-framework-path",
            Self::ModulePath => "syn-module-path",
            Self::Builtin => "syn-builtin",
            Self::Visibility => "syn-visibility",
            Self::Keyword => "syn-keyword",
            Self::Primitive => "syn-primitive",
            Self::TypeParams => "syn-type-params",
            Self::Operator => "syn-operator",
        }
    }
}

/// One styled span of a line.
///
/// `text` is the raw slice of the input line: concatenating the `text` of all
/// tokens of a line reproduces the line exactly. Escaping for display happens
/// at render time, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub style: Option<Style>,
}

/// What a completion candidate is, for icon/grouping purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Keyword,
    Type,
    Function,
    Module,
    Struct,
    Variable,
    Attribute,
    Snippet,
}

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Label shown in the list; also the dedup key.
    pub label: String,
    /// Text inserted on apply. Falls back to `label` when absent.
    pub insert_text: Option<String>,
    pub kind: SuggestionKind,
    /// Optional annotation shown next to the label (e.g. the defining module).
    pub detail: Option<String>,
}

/// Keys the session reacts to. The host maps its real input events onto
/// these; everything else stays host-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
}
