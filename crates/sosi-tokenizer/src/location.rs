//! Source location tracking.

use std::fmt;

/// A position in the decoded source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number, starting at 1. Zero means unknown.
    pub line: u32,
    /// Column in characters, starting at 1.
    pub column: u32,
    /// Byte offset into the decoded UTF-8 text.
    pub offset: u32,
}

impl Location {
    /// Location of nodes that were not read from a source.
    pub const UNKNOWN: Location = Location {
        line: 0,
        column: 0,
        offset: 0,
    };

    /// The first character of a source.
    pub const START: Location = Location {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Create a new location.
    #[inline]
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Whether this is [`Location::UNKNOWN`].
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }

    /// Byte range of a single character at this location, for diagnostics.
    pub fn range(&self, source_len: usize) -> std::ops::Range<usize> {
        if self.is_unknown() {
            return 0..0;
        }
        let start = (self.offset as usize).min(source_len);
        start..(start + 1).min(source_len).max(start)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::UNKNOWN
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("unknown location")
        } else {
            write!(f, "line {}, column {}", self.line, self.column)
        }
    }
}
