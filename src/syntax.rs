//! Move tokenizer: turns one line of source text into an ordered sequence of
//! styled spans.
//!
//! The scanner walks the line left to right. At each position a fixed,
//! strictly ordered list of matcher functions is tried; the first match wins
//! and consumes its length. If nothing matches, the single character at the
//! position is emitted unstyled. This guarantees termination and total
//! coverage: every input line tokenizes, and concatenating the raw token
//! texts reproduces the line exactly.
//!
//! The rule order is load-bearing: rules overlap (`///` vs `//`, `b"…"` vs
//! `"…"`, `0x…` vs a number, a keyword vs a module path) and reordering them
//! changes what wins.

use crate::types::{Style, Token};
use crate::utils::is_word_char;

/// Reserved Move keywords, word-boundary matched.
pub const KEYWORDS: &[&str] = &[
    "acquires", "module", "use", "struct", "fun", "entry", "public", "private", "const", "native",
    "has", "key", "store", "copy", "drop", "phantom", "friend", "script", "enum", "match",
    "if", "else", "while", "loop", "return", "abort", "break", "continue",
    "let", "mut", "move", "true", "false", "as", "spec", "test", "test_only",
];

/// Primitive type names, including the Move 2.0 signed integers.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "u256",
    "i8", "i16", "i32", "i64", "i128", "i256",
    "bool", "address", "vector", "signer", "String",
];

/// Built-in intrinsic functions and macros.
pub const BUILTINS: &[&str] = &[
    "assert!", "move_to", "move_from", "borrow_global", "borrow_global_mut", "exists",
    "freeze", "copy", "move",
];

/// Parenthesized visibility modifier forms.
const VISIBILITY_FORMS: &[&str] = &["public(friend)", "public(package)", "public(script)"];

/// Integer width suffixes accepted directly after a numeric literal.
const NUMBER_SUFFIXES: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "u256",
    "i8", "i16", "i32", "i64", "i128", "i256",
];

/// The fixed operator set. Matching picks the longest operator that applies,
/// so `&&` never splits into two `&`.
const OPERATORS: &[&str] = &[
    "::", "&mut", "&", "->", "=>", "&&", "||", "==", "!=", "<=", ">=", "<", ">",
    "+", "-", "*", "/", "%", "!",
];

/// Module path prefixes that belong to the standard library / framework.
const FRAMEWORK_PREFIXES: &[&str] = &["std::", "aptos_std::", "aptos_framework::"];

/// Tokenize one line. Pure and total: any input produces a token sequence
/// whose concatenated text equals the input.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < line.len() {
        let rest = &line[pos..];
        if let Some((len, style)) = match_at(rest, pos == 0) {
            tokens.push(Token { text: rest[..len].to_string(), style: Some(style) });
            pos += len;
        } else {
            // Fallback: one raw character, unstyled.
            let ch_len = rest.chars().next().map_or(1, char::len_utf8);
            tokens.push(Token { text: rest[..ch_len].to_string(), style: None });
            pos += ch_len;
        }
    }

    tokens
}

/// Try each rule in priority order; first match wins.
fn match_at(rest: &str, at_line_start: bool) -> Option<(usize, Style)> {
    if let Some(len) = match_attribute(rest) {
        return Some((len, Style::Attribute));
    }
    if let Some(len) = match_doc_comment(rest) {
        return Some((len, Style::DocComment));
    }
    if let Some(len) = match_line_comment(rest) {
        return Some((len, Style::Comment));
    }
    if let Some(len) = match_byte_string(rest) {
        return Some((len, Style::ByteString));
    }
    if let Some(len) = match_string(rest) {
        return Some((len, Style::Str));
    }
    if let Some(len) = match_address(rest) {
        return Some((len, Style::Address));
    }
    if let Some(len) = match_number(rest) {
        return Some((len, Style::Number));
    }
    if let Some((len, style)) = match_module_path(rest) {
        return Some((len, style));
    }
    if let Some(len) = match_word_from(rest, BUILTINS) {
        return Some((len, Style::Builtin));
    }
    if let Some(len) = match_visibility(rest) {
        return Some((len, Style::Visibility));
    }
    if let Some(len) = match_word_from(rest, KEYWORDS) {
        return Some((len, Style::Keyword));
    }
    if let Some(len) = match_word_from(rest, PRIMITIVE_TYPES) {
        return Some((len, Style::Primitive));
    }
    if let Some(len) = match_generic(rest, at_line_start) {
        return Some((len, Style::TypeParams));
    }
    if let Some(len) = match_operator(rest) {
        return Some((len, Style::Operator));
    }
    None
}

/// `#[…]`. An unterminated bracket does not match.
fn match_attribute(rest: &str) -> Option<usize> {
    if !rest.starts_with("#[") {
        return None;
    }
    rest.find(']').map(|i| i + 1)
}

/// `///` to end of line.
fn match_doc_comment(rest: &str) -> Option<usize> {
    rest.starts_with("///").then_some(rest.len())
}

/// `//` followed by a non-`/` character, to end of line. A bare `//` at the
/// end of a line falls through to the operator rule.
fn match_line_comment(rest: &str) -> Option<usize> {
    if !rest.starts_with("//") {
        return None;
    }
    match rest[2..].chars().next() {
        Some(c) if c != '/' => Some(rest.len()),
        _ => None,
    }
}

/// `b"…"` with a closing quote.
fn match_byte_string(rest: &str) -> Option<usize> {
    if !rest.starts_with("b\"") {
        return None;
    }
    rest[2..].find('"').map(|i| i + 3)
}

/// `"…"` with a closing quote. An unterminated string falls through to the
/// per-character fallback.
fn match_string(rest: &str) -> Option<usize> {
    if !rest.starts_with('"') {
        return None;
    }
    rest[1..].find('"').map(|i| i + 2)
}

/// `0x…` or `@0x…` hex addresses.
fn match_address(rest: &str) -> Option<usize> {
    let (at, body) = match rest.strip_prefix('@') {
        Some(b) => (1, b),
        None => (0, rest),
    };
    let hex = body.strip_prefix("0x")?;
    let digits = hex.chars().take_while(char::is_ascii_hexdigit).count();
    if digits == 0 {
        return None;
    }
    Some(at + 2 + digits)
}

/// Digits with an optional fixed-width suffix: `100u64` is one token.
fn match_number(rest: &str) -> Option<usize> {
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    for suffix in NUMBER_SUFFIXES {
        if rest[digits..].starts_with(suffix) {
            return Some(digits + suffix.len());
        }
    }
    Some(digits)
}

/// `ident(::ident)+`. Standard-library and framework paths get their own
/// style so `std::signer` reads differently from a user module path.
fn match_module_path(rest: &str) -> Option<(usize, Style)> {
    let first = ident_len(rest);
    if first == 0 {
        return None;
    }
    let mut len = first;
    let mut segments = 1;
    loop {
        let tail = &rest[len..];
        if !tail.starts_with("::") {
            break;
        }
        let seg = ident_len(&tail[2..]);
        if seg == 0 {
            break;
        }
        len += 2 + seg;
        segments += 1;
    }
    if segments < 2 {
        return None;
    }
    let style = if FRAMEWORK_PREFIXES.iter().any(|p| rest[..len].starts_with(p)) {
        Style::FrameworkPath
    } else {
        Style::ModulePath
    };
    Some((len, style))
}

/// Length of a leading `[A-Za-z_][A-Za-z0-9_]*` identifier, or 0.
fn ident_len(s: &str) -> usize {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    1 + chars.take_while(|c| c.is_ascii_alphanumeric() || *c == '_').count()
}

/// Exact match from a fixed word list. Names ending in a word character
/// require a word boundary after them, so `letter` never matches `let` and
/// `borrow_global_mut` is not eaten by `borrow_global`.
fn match_word_from(rest: &str, words: &[&str]) -> Option<usize> {
    for word in words {
        if !rest.starts_with(word) {
            continue;
        }
        let ends_in_word_char = word.chars().last().is_some_and(is_word_char);
        let followed_by_word_char = rest[word.len()..].chars().next().is_some_and(is_word_char);
        if !ends_in_word_char || !followed_by_word_char {
            return Some(word.len());
        }
    }
    None
}

/// `public(friend)` and friends.
fn match_visibility(rest: &str) -> Option<usize> {
    VISIBILITY_FORMS
        .iter()
        .find(|form| rest.starts_with(**form))
        .map(|form| form.len())
}

/// `<…>` generic parameter groups, only when not at the start of a line, so
/// a leading comparison is not misread.
fn match_generic(rest: &str, at_line_start: bool) -> Option<usize> {
    if at_line_start || !rest.starts_with('<') {
        return None;
    }
    match rest[1..].find('>') {
        Some(0) | None => None,
        Some(i) => Some(i + 2),
    }
}

/// Longest match among the fixed operator set.
fn match_operator(rest: &str) -> Option<usize> {
    OPERATORS
        .iter()
        .filter(|op| rest.starts_with(**op))
        .map(|op| op.len())
        .max()
}

/// Escape the characters that would break a styled display surface.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render one line as HTML spans. Token text is escaped here; the tokens
/// themselves stay raw so length bookkeeping and round-tripping work on the
/// original text.
pub fn render_html(line: &str) -> String {
    let mut out = String::new();
    for token in tokenize(line) {
        match token.style {
            Some(style) => {
                out.push_str("<span class=\"");
                out.push_str(style.css_class());
                out.push_str("\">");
                out.push_str(&escape_html(&token.text));
                out.push_str("</span>");
            }
            None => out.push_str(&escape_html(&token.text)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(line: &str) -> String {
        tokenize(line).iter().map(|t| t.text.as_str()).collect()
    }

    fn styles(line: &str) -> Vec<Option<Style>> {
        tokenize(line).iter().map(|t| t.style).collect()
    }

    fn first(line: &str) -> Token {
        tokenize(line).into_iter().next().unwrap()
    }

    // ==================== round-trip tests ====================

    #[test]
    fn round_trip_reproduces_input() {
        let lines = [
            "",
            "module 0x1::counter {",
            "    public entry fun increment(account: &signer) acquires Counter {",
            "        let c = borrow_global_mut<Counter>(signer::address_of(account));",
            "        c.value = c.value + 1;",
            "    }",
            "/// doc ✓ with unicode — and emoji 😀",
            "  \t weird \\ input ~~ $$ @@",
            "b\"unterminated",
            "\"also unterminated",
            "#[unclosed attribute",
        ];
        for line in lines {
            assert_eq!(joined(line), line, "round-trip failed for {line:?}");
        }
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    // ==================== priority tests ====================

    #[test]
    fn doc_comment_is_one_token() {
        let tokens = tokenize("/// doc comment");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].style, Some(Style::DocComment));
        assert_eq!(tokens[0].text, "/// doc comment");
    }

    #[test]
    fn line_comment_after_doc_check() {
        let t = first("// plain comment");
        assert_eq!(t.style, Some(Style::Comment));
        assert_eq!(t.text, "// plain comment");
    }

    #[test]
    fn bare_double_slash_is_operators() {
        assert_eq!(styles("//"), vec![Some(Style::Operator), Some(Style::Operator)]);
    }

    #[test]
    fn byte_string_before_string() {
        let t = first("b\"hello\" rest");
        assert_eq!(t.style, Some(Style::ByteString));
        assert_eq!(t.text, "b\"hello\"");
    }

    #[test]
    fn string_literal() {
        let t = first("\"hi\" + x");
        assert_eq!(t.style, Some(Style::Str));
        assert_eq!(t.text, "\"hi\"");
    }

    #[test]
    fn address_before_number() {
        let t = first("0x1abc");
        assert_eq!(t.style, Some(Style::Address));
        assert_eq!(t.text, "0x1abc");
        let t = first("@0xCAFE");
        assert_eq!(t.text, "@0xCAFE");
    }

    #[test]
    fn numeric_suffix_is_one_token() {
        let t = first("100u64");
        assert_eq!(t.style, Some(Style::Number));
        assert_eq!(t.text, "100u64");
    }

    #[test]
    fn number_without_suffix_stops_at_identifier() {
        let tokens = tokenize("100abc");
        assert_eq!(tokens[0].text, "100");
        assert_eq!(tokens[0].style, Some(Style::Number));
    }

    // ==================== word boundary tests ====================

    #[test]
    fn keyword_needs_trailing_boundary() {
        // `letter` must not tokenize as `let` + `ter`
        let tokens = tokenize("letter");
        assert!(tokens.iter().all(|t| t.style.is_none()), "{tokens:?}");
        assert_eq!(joined("letter"), "letter");
    }

    #[test]
    fn keyword_at_word_end() {
        let t = first("let x = 1;");
        assert_eq!(t.style, Some(Style::Keyword));
        assert_eq!(t.text, "let");
    }

    #[test]
    fn builtin_with_bang_matches_before_call_paren() {
        let t = first("assert!(x > 0, 1)");
        assert_eq!(t.style, Some(Style::Builtin));
        assert_eq!(t.text, "assert!");
    }

    #[test]
    fn builtin_longest_name_wins() {
        let t = first("borrow_global_mut<Counter>");
        assert_eq!(t.style, Some(Style::Builtin));
        assert_eq!(t.text, "borrow_global_mut");
    }

    #[test]
    fn primitive_type_boundary() {
        let tokens = tokenize("u64x");
        assert!(tokens.iter().all(|t| t.style.is_none()));
    }

    // ==================== path and modifier tests ====================

    #[test]
    fn framework_path_style() {
        let t = first("std::signer::address_of(a)");
        assert_eq!(t.style, Some(Style::FrameworkPath));
        assert_eq!(t.text, "std::signer::address_of");
    }

    #[test]
    fn user_path_style() {
        let t = first("counter::increment()");
        assert_eq!(t.style, Some(Style::ModulePath));
        assert_eq!(t.text, "counter::increment");
    }

    #[test]
    fn path_beats_keyword_prefix() {
        // in `use std::vector;` the path token must not split at `vector`
        let tokens = tokenize("use std::vector;");
        assert_eq!(tokens[0].text, "use");
        assert_eq!(tokens[2].text, "std::vector");
        assert_eq!(tokens[2].style, Some(Style::FrameworkPath));
    }

    #[test]
    fn visibility_form() {
        let t = first("public(friend) fun helper()");
        assert_eq!(t.style, Some(Style::Visibility));
        assert_eq!(t.text, "public(friend)");
    }

    #[test]
    fn attribute_token() {
        let t = first("#[test_only] module x {}");
        assert_eq!(t.style, Some(Style::Attribute));
        assert_eq!(t.text, "#[test_only]");
    }

    // ==================== generics and operators ====================

    #[test]
    fn generic_group_not_at_line_start() {
        let tokens = tokenize("vector<u64>");
        assert_eq!(tokens[0].text, "vector");
        assert_eq!(tokens[1].text, "<u64>");
        assert_eq!(tokens[1].style, Some(Style::TypeParams));
    }

    #[test]
    fn angle_at_line_start_is_operator() {
        let tokens = tokenize("<T>");
        assert_eq!(tokens[0].text, "<");
        assert_eq!(tokens[0].style, Some(Style::Operator));
    }

    #[test]
    fn operator_longest_match() {
        let tokens = tokenize("a && b");
        assert_eq!(tokens[2].text, "&&");
        assert_eq!(tokens[2].style, Some(Style::Operator));
        let tokens = tokenize("x -> y");
        assert_eq!(tokens[2].text, "->");
        let tokens = tokenize("&mut v");
        assert_eq!(tokens[0].text, "&mut");
    }

    // ==================== rendering tests ====================

    #[test]
    fn escape_covers_the_three_characters() {
        assert_eq!(escape_html("a<b && c>d"), "a&lt;b &amp;&amp; c&gt;d");
    }

    #[test]
    fn render_escapes_inside_spans() {
        let html = render_html("let x = a < 2;");
        assert!(html.contains("<span class=\"syn-keyword\">let</span>"), "{html}");
        assert!(html.contains("&lt;"), "{html}");
        assert!(!html.contains("= a < 2"), "{html}");
    }
}
