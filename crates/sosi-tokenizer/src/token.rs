//! Token types for the SOSI tokenizer.

use std::borrow::Cow;
use std::fmt;

use crate::{Location, Number, NumberForm, ReferenceLiteral};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of `.` characters; its length is the nesting depth.
    Level,
    /// The name following a level: `HODE`, `PUNKT`, ...
    ElementName,
    /// Quoted (`"..."`, `'...'`) or bare string.
    String,
    /// Numeric literal.
    Number,
    /// Serial number: `N:`
    SerialNumber,
    /// Reference number: `:N`
    Reference,
    /// `*` (unspecified)
    Asterisk,
    /// `@` (default)
    AtMark,
    /// `&` (concatenation)
    Ampersand,
    /// `! ...` up to end of line
    Comment,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether this token carries an element value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::SerialNumber
                | TokenKind::Reference
                | TokenKind::Asterisk
                | TokenKind::AtMark
        )
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Level => "LEVEL",
            TokenKind::ElementName => "ELEMENT_NAME",
            TokenKind::String => "VALUE_STRING",
            TokenKind::Number => "VALUE_NUMBER",
            TokenKind::SerialNumber => "COLON_VALUE",
            TokenKind::Reference => "VALUE_COLON",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::AtMark => "AT_MARK",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Comment => "EXCLAMATION_MARK",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an unquoted, whitespace-delimited run.
///
/// Order: reference (`:N`), serial number (`N:`), number, string.
pub fn classify(text: &str) -> (TokenKind, Option<NumberForm>) {
    if ReferenceLiteral::matches(text) {
        return (TokenKind::Reference, None);
    }
    if let Some(digits) = text.strip_suffix(':')
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
    {
        return (TokenKind::SerialNumber, None);
    }
    match NumberForm::classify(text) {
        Some(form) => (TokenKind::Number, Some(form)),
        None => (TokenKind::String, None),
    }
}

/// A token with its kind, raw text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The raw source text, including quotes and the leading `!` of comments.
    pub text: String,
    /// Where the token starts.
    pub location: Location,
    /// Just past the last character of the token.
    pub end: Location,
    /// How a number token was classified.
    pub number_form: Option<NumberForm>,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: String, location: Location, end: Location) -> Self {
        Self {
            kind,
            text,
            location,
            end,
            number_form: None,
        }
    }

    /// Nesting depth of a level token.
    pub fn level(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether a string token was quoted.
    pub fn is_quoted(&self) -> bool {
        self.kind == TokenKind::String && self.text.starts_with(['"', '\''])
    }

    /// The string value, with quotes removed and doubled quotes collapsed.
    pub fn unescaped(&self) -> Cow<'_, str> {
        if !self.is_quoted() || self.text.len() < 2 {
            return Cow::Borrowed(&self.text);
        }
        let quote = &self.text[..1];
        let inner = &self.text[1..self.text.len() - 1];
        let doubled = if quote == "\"" { "\"\"" } else { "''" };
        if inner.contains(doubled) {
            Cow::Owned(inner.replace(doubled, quote))
        } else {
            Cow::Borrowed(inner)
        }
    }

    /// Comment text after the `!`.
    pub fn comment_text(&self) -> &str {
        self.text.strip_prefix('!').unwrap_or(&self.text)
    }

    /// The value of a number token.
    pub fn number(&self) -> Option<Number> {
        match self.number_form {
            Some(form) => Number::from_classified(&self.text, form),
            None => Number::parse(&self.text),
        }
    }

    /// The value of a serial number token (`N:`).
    pub fn serial_number(&self) -> Option<u64> {
        self.text.strip_suffix(':')?.parse().ok()
    }

    /// The value of a reference token (`:N`).
    pub fn reference(&self) -> Option<ReferenceLiteral> {
        ReferenceLiteral::parse(&self.text)
    }
}
