//! `movepad` — the editor core of a web IDE for Move smart contracts.
//!
//! ## Reading guide (high level architecture)
//! - **`workspace::Workspace`**: the multi-file project store, a map of named
//!   documents with kind/read-only rules and create/delete/rename validation.
//! - **`buffer::CodeBuffer`**: the live text of the active document (a rope),
//!   with char-offset editing primitives and cursor derivation.
//! - **`syntax`**: the Move tokenizer, a fixed ordered list of matcher
//!   functions that turn one line into styled spans, plus HTML-safe rendering.
//! - **`completion::CompletionEngine`**: ranked, deduplicated suggestions from
//!   keywords, types, intrinsics, symbols scanned out of the buffer, framework
//!   modules, and snippets.
//! - **`sync::Synchronizer`**: debounced persistence against a `ProjectStore`;
//!   failed writes are logged and swallowed, the workspace stays authoritative.
//! - **`editor::EditorSession`**: the owning session object the host drives
//!   with keys, ticks, and file navigation. No globals: the host constructs
//!   one and passes it around.
//!
//! The crate has no UI and no network surface of its own: the host renders the
//! token stream and suggestion list, and supplies a `ProjectStore`
//! implementation for the remote side.

pub mod buffer;
pub mod completion;
pub mod config;
pub mod editor;
pub mod sync;
pub mod syntax;
pub mod types;
pub mod utils;
pub mod workspace;

pub use buffer::CodeBuffer;
pub use completion::CompletionEngine;
pub use config::EditorConfig;
pub use editor::EditorSession;
pub use sync::{MemoryStore, ProjectStore, StoredFile, Synchronizer};
pub use types::{Cursor, Document, EditorKey, FileKind, Style, Suggestion, SuggestionKind, Token};
pub use workspace::Workspace;
