//! Switches that relax the grammar.

/// Parser feature flags. Everything is strict by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserFeatures {
    /// Accept elements that have neither values nor children.
    pub allow_empty_elements: bool,
    /// Accept a missing or unknown `..TEGNSETT`, decoding as ISO-8859-1.
    pub allow_invalid_charset: bool,
}

impl ParserFeatures {
    /// Strict parsing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every relaxation enabled.
    pub fn permissive() -> Self {
        Self {
            allow_empty_elements: true,
            allow_invalid_charset: true,
        }
    }

    /// Set whether empty elements are accepted.
    pub fn allow_empty_elements(mut self, allow: bool) -> Self {
        self.allow_empty_elements = allow;
        self
    }

    /// Set whether a missing or unknown charset is accepted.
    pub fn allow_invalid_charset(mut self, allow: bool) -> Self {
        self.allow_invalid_charset = allow;
        self
    }
}
