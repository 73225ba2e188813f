//! Context-aware completion: given the full buffer text and a cursor
//! position, produce a ranked, deduplicated, bounded list of suggestions.
//!
//! Candidates are merged from the fixed language tables in [`crate::syntax`],
//! module-level symbols scanned out of the buffer itself, a table of
//! well-known framework modules, and canned snippets. Matching is
//! prefix-based against the partial word ending at the cursor; exact-prefix
//! matches rank before substring matches.

use crate::syntax::{BUILTINS, KEYWORDS, PRIMITIVE_TYPES};
use crate::types::{Cursor, Suggestion, SuggestionKind};
use crate::utils::{trailing_path, trailing_word};
use regex::Regex;

/// Well-known framework modules and their commonly used member functions.
const FRAMEWORK_MODULES: &[(&str, &[&str])] = &[
    ("std::signer", &["address_of", "borrow_address"]),
    ("std::vector", &[
        "empty", "length", "borrow", "borrow_mut", "push_back", "pop_back", "swap",
        "contains", "destroy_empty",
    ]),
    ("std::string", &["utf8", "length", "append", "sub_string", "is_empty"]),
    ("std::error", &[
        "not_found", "invalid_argument", "invalid_state", "permission_denied",
        "already_exists", "unauthenticated",
    ]),
    ("std::option", &["some", "none", "is_some", "is_none", "borrow", "extract"]),
    ("aptos_std::table", &["new", "add", "borrow", "borrow_mut", "upsert", "remove", "contains"]),
    ("aptos_framework::coin", &["transfer", "balance", "register", "deposit", "withdraw"]),
    ("aptos_framework::account", &["create_account", "exists_at", "get_sequence_number"]),
    ("aptos_framework::event", &["emit", "emit_event"]),
    ("aptos_framework::timestamp", &["now_seconds", "now_microseconds"]),
];

/// Attribute names offered inside `#[…]`.
const ATTRIBUTES: &[&str] = &["view", "test", "test_only", "event", "deprecated", "expected_failure"];

/// Canned multi-line snippets. Labels are multi-word so they never collide
/// with the bare keyword entries.
const SNIPPETS: &[(&str, &str, &str)] = &[
    ("public fun", "public fun ", "function header"),
    ("entry fun", "public entry fun name(account: &signer) {\n\n}", "entry function"),
    ("module skeleton", "module 0x1::example {\n\n}", "module block"),
    ("struct resource", "struct Name has key {\n\n}", "resource struct"),
    ("module init", "fun init_module(account: &signer) {\n\n}", "module initializer"),
    ("test fun", "#[test]\nfun test_name() {\n\n}", "unit test"),
];

/// The completion engine. Holds the compiled symbol-scanning patterns so
/// they are built once per session, not per keystroke.
pub struct CompletionEngine {
    fun_re: Regex,
    struct_re: Regex,
    const_re: Regex,
    module_re: Regex,
    max_results: usize,
}

impl CompletionEngine {
    /// Build an engine returning at most `max_results` suggestions.
    pub fn new(max_results: usize) -> Self {
        // The patterns are fixed literals; compilation cannot fail.
        Self {
            fun_re: Regex::new(
                r"(?m)^\s*(?:public(?:\(\w+\))?\s+)?(?:entry\s+)?(?:native\s+)?fun\s+([A-Za-z_]\w*)",
            )
            .unwrap(),
            struct_re: Regex::new(r"(?m)^\s*struct\s+([A-Za-z_]\w*)").unwrap(),
            const_re: Regex::new(r"(?m)^\s*const\s+([A-Za-z_]\w*)").unwrap(),
            module_re: Regex::new(r"(?m)^\s*module\s+([\w:]+)").unwrap(),
            max_results,
        }
    }

    /// Suggestions for the partial word ending at `cursor` in `text`.
    ///
    /// Returns an empty list when there is nothing to complete (no partial
    /// word, unknown line). Results are deduplicated by label and bounded.
    pub fn suggest(&self, text: &str, cursor: Cursor) -> Vec<Suggestion> {
        let Some(line) = text.split('\n').nth(cursor.line.saturating_sub(1)) else {
            return Vec::new();
        };
        let prefix: String = line.chars().take(cursor.column.saturating_sub(1)).collect();
        let partial = trailing_word(&prefix);
        let before = &prefix[..prefix.len() - partial.len()];

        let candidates = if let Some(module) = qualified_module(before) {
            module_members(module)
        } else if before.ends_with("#[") {
            if partial.is_empty() {
                return Vec::new();
            }
            attribute_candidates()
        } else {
            if partial.is_empty() {
                return Vec::new();
            }
            self.general_candidates(text)
        };

        rank(candidates, partial, self.max_results)
    }

    /// All non-qualified candidate sources, in merge order.
    fn general_candidates(&self, text: &str) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for kw in KEYWORDS {
            out.push(plain(kw, SuggestionKind::Keyword, None));
        }
        for ty in PRIMITIVE_TYPES {
            out.push(plain(ty, SuggestionKind::Type, None));
        }
        for builtin in BUILTINS {
            out.push(plain(builtin, SuggestionKind::Function, Some("built-in")));
        }
        self.scan_symbols(text, &mut out);
        for (module, _) in FRAMEWORK_MODULES {
            out.push(plain(module, SuggestionKind::Module, Some("framework")));
        }
        for (label, insert, detail) in SNIPPETS {
            out.push(Suggestion {
                label: (*label).to_string(),
                insert_text: Some((*insert).to_string()),
                kind: SuggestionKind::Snippet,
                detail: Some((*detail).to_string()),
            });
        }
        out
    }

    /// Module-level symbols declared in the buffer itself. The buffer is the
    /// index; there is no external symbol database.
    fn scan_symbols(&self, text: &str, out: &mut Vec<Suggestion>) {
        for caps in self.fun_re.captures_iter(text) {
            out.push(plain(&caps[1], SuggestionKind::Function, Some("declared fun")));
        }
        for caps in self.struct_re.captures_iter(text) {
            out.push(plain(&caps[1], SuggestionKind::Struct, Some("declared struct")));
        }
        for caps in self.const_re.captures_iter(text) {
            out.push(plain(&caps[1], SuggestionKind::Variable, Some("declared const")));
        }
        for caps in self.module_re.captures_iter(text) {
            out.push(plain(&caps[1], SuggestionKind::Module, Some("declared module")));
        }
    }
}

/// If the text before the partial word ends in a known module path followed
/// by `::`, return that module's table entry.
fn qualified_module(before: &str) -> Option<&'static (&'static str, &'static [&'static str])> {
    let path = trailing_path(before);
    let module = path.strip_suffix("::")?;
    FRAMEWORK_MODULES.iter().find(|(name, _)| {
        *name == module || name.ends_with(&format!("::{module}"))
    })
}

fn module_members(module: &(&'static str, &'static [&'static str])) -> Vec<Suggestion> {
    module
        .1
        .iter()
        .map(|member| plain(member, SuggestionKind::Function, Some(module.0)))
        .collect()
}

fn attribute_candidates() -> Vec<Suggestion> {
    ATTRIBUTES
        .iter()
        .map(|attr| plain(attr, SuggestionKind::Attribute, None))
        .collect()
}

fn plain(label: &str, kind: SuggestionKind, detail: Option<&str>) -> Suggestion {
    Suggestion {
        label: label.to_string(),
        insert_text: None,
        kind,
        detail: detail.map(str::to_string),
    }
}

/// Filter, rank, dedup, bound. Exact-prefix matches come first (in merge
/// order), then substring matches; duplicates keep the first occurrence.
fn rank(candidates: Vec<Suggestion>, partial: &str, max_results: usize) -> Vec<Suggestion> {
    let mut prefixed = Vec::new();
    let mut fuzzy = Vec::new();
    for s in candidates {
        if s.label.starts_with(partial) {
            prefixed.push(s);
        } else if !partial.is_empty() && s.label.contains(partial) {
            fuzzy.push(s);
        }
    }
    prefixed.extend(fuzzy);

    let mut seen = std::collections::HashSet::new();
    prefixed.retain(|s| seen.insert(s.label.clone()));
    prefixed.truncate(max_results);
    prefixed
}
