//! Utility functions.

use std::cmp::min;

/// Convert a "character index" to a "byte index" in a UTF-8 string.
///
/// Why this exists: Rust strings are UTF-8, so you cannot safely slice with
/// `s[a..b]` unless `a` and `b` are **byte offsets** that lie on UTF-8
/// character boundaries.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    let mut ci = 0usize;
    for (bi, _) in s.char_indices() {
        if ci == char_idx {
            return bi;
        }
        ci += 1;
    }
    s.len()
}

/// Convert a byte offset back into a character index.
pub fn byte_to_char_index(s: &str, byte_idx: usize) -> usize {
    s[..min(byte_idx, s.len())].chars().count()
}

/// Characters that make up an identifier.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters that keep the completion popup alive: identifier characters
/// plus the path separator.
pub fn is_trigger_char(c: char) -> bool {
    is_word_char(c) || c == ':'
}

/// The maximal trailing run of word characters in `prefix`: the partial word
/// the user is in the middle of typing.
pub fn trailing_word(prefix: &str) -> &str {
    let start = prefix
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map_or(prefix.len(), |(i, _)| i);
    &prefix[start..]
}

/// Like [`trailing_word`] but also spanning `::` separators, e.g. the
/// `std::vector::pu` in `let v = std::vector::pu`.
pub fn trailing_path(prefix: &str) -> &str {
    let start = prefix
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_trigger_char(c))
        .last()
        .map_or(prefix.len(), |(i, _)| i);
    &prefix[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== char_to_byte_index tests ====================

    #[test]
    fn char_to_byte_ascii() {
        let s = "hello";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 1);
        assert_eq!(char_to_byte_index(s, 5), 5);
    }

    #[test]
    fn char_to_byte_unicode() {
        // "héllo" - 'é' is 2 bytes in UTF-8
        let s = "héllo";
        assert_eq!(char_to_byte_index(s, 1), 1);
        assert_eq!(char_to_byte_index(s, 2), 3);
        assert_eq!(char_to_byte_index(s, 4), 5);
    }

    #[test]
    fn char_to_byte_beyond_end() {
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn byte_to_char_unicode() {
        let s = "héllo";
        assert_eq!(byte_to_char_index(s, 1), 1);
        assert_eq!(byte_to_char_index(s, 3), 2);
        assert_eq!(byte_to_char_index(s, 100), 5);
    }

    // ==================== word classification tests ====================

    #[test]
    fn word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('0'));
        assert!(is_word_char('_'));
        assert!(!is_word_char(':'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('é'));
    }

    #[test]
    fn trigger_chars_include_path_separator() {
        assert!(is_trigger_char(':'));
        assert!(is_trigger_char('x'));
        assert!(!is_trigger_char('('));
    }

    // ==================== trailing word tests ====================

    #[test]
    fn trailing_word_simple() {
        assert_eq!(trailing_word("let co"), "co");
        assert_eq!(trailing_word("co"), "co");
        assert_eq!(trailing_word(""), "");
    }

    #[test]
    fn trailing_word_stops_at_separator() {
        assert_eq!(trailing_word("std::vec"), "vec");
        assert_eq!(trailing_word("foo("), "");
        assert_eq!(trailing_word("a b_c2"), "b_c2");
    }

    #[test]
    fn trailing_path_spans_separators() {
        assert_eq!(trailing_path("let v = std::vector::pu"), "std::vector::pu");
        assert_eq!(trailing_path("std::vector::"), "std::vector::");
        assert_eq!(trailing_path("x + y"), "");
    }
}
