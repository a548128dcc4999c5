//! Formatting options for SOSI output.

use sosi_encoding::{Charset, DEFAULT_REPLACEMENT};

/// Where line breaks go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Every element starts a new line, with its values on the same line.
    #[default]
    OneElementPerLine,
    /// Elements that shared a source line stay on one line. Elements without
    /// a source location start a new line.
    PreserveLines,
}

/// Options for SOSI output.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Charset of the encoded output; also written to `..TEGNSETT` (default: UTF-8)
    pub charset: Charset,

    /// Byte written for characters the charset cannot encode (default: `?`)
    pub replacement: u8,

    /// Line break placement (default: one element per line)
    pub layout: Layout,

    /// Indentation repeated once per level below the top (default: none)
    pub indent: &'static str,

    /// Line terminator (default: "\n")
    pub line_ending: &'static str,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            charset: Charset::Utf8,
            replacement: DEFAULT_REPLACEMENT,
            layout: Layout::default(),
            indent: "",
            line_ending: "\n",
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output charset.
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the replacement byte for unencodable characters.
    pub fn replacement(mut self, replacement: u8) -> Self {
        self.replacement = replacement;
        self
    }

    /// Set the layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Reproduce the source line breaks.
    pub fn preserve_lines(self) -> Self {
        self.layout(Layout::PreserveLines)
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Use CRLF line endings.
    pub fn crlf(mut self) -> Self {
        self.line_ending = "\r\n";
        self
    }
}
