//! String quoting for SOSI output.

use sosi_tokenizer::{TokenKind, classify};

/// Check if a string can be written without quotes.
///
/// A bare string is valid when:
/// 1. It's not empty and contains no whitespace or quotes
/// 2. It doesn't start with a character the tokenizer treats specially
///    (`.` level, `!` comment, `*`, `@`, `&`)
/// 3. It doesn't re-lex as a number, serial number or reference
pub fn can_be_bare(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if matches!(first, '.' | '!' | '*' | '@' | '&') {
        return false;
    }
    if s.chars().any(|c| {
        matches!(c, '"' | '\'' | '\u{FEFF}') || c.is_whitespace() || c.is_control()
    }) {
        return false;
    }
    classify(s).0 == TokenKind::String
}

/// Wrap a string in double quotes, doubling any embedded double quote.
pub fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        if c == '"' {
            result.push('"');
        }
        result.push(c);
    }
    result.push('"');
    result
}
