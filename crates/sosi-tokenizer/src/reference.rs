//! Reference numbers (`:N`).

use std::fmt;

/// A reference to another feature's serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceNumber {
    /// The referenced serial number.
    pub number: u64,
    /// Whether this reference belongs to a reference island.
    pub inside_island: bool,
    /// Whether the referenced feature is traversed in reverse order (`:-N`).
    pub reversed: bool,
}

impl ReferenceNumber {
    /// A plain forward reference.
    pub fn new(number: u64) -> Self {
        Self {
            number,
            inside_island: false,
            reversed: false,
        }
    }

    /// The same reference traversed in reverse.
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// The same reference marked as part of an island.
    pub fn in_island(mut self) -> Self {
        self.inside_island = true;
        self
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, ":-{}", self.number)
        } else {
            write!(f, ":{}", self.number)
        }
    }
}

/// A reference token as written: `:N`, `:-N`, with optional `(` / `)` island marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceLiteral {
    /// The referenced serial number.
    pub number: u64,
    /// Written as `:-N`.
    pub reversed: bool,
    /// Preceded by `(`.
    pub opens_island: bool,
    /// Followed by `)`.
    pub closes_island: bool,
}

impl ReferenceLiteral {
    /// Whether `text` has the shape of a reference, ignoring overflow.
    pub fn matches(text: &str) -> bool {
        split(text).is_some()
    }

    /// Parse `text`; `None` if it is not a reference or the number overflows.
    pub fn parse(text: &str) -> Option<ReferenceLiteral> {
        let (opens_island, reversed, digits, closes_island) = split(text)?;
        Some(ReferenceLiteral {
            number: digits.parse().ok()?,
            reversed,
            opens_island,
            closes_island,
        })
    }
}

fn split(text: &str) -> Option<(bool, bool, &str, bool)> {
    let (opens, rest) = match text.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (rest, closes) = match rest.strip_suffix(')') {
        Some(rest) => (rest, true),
        None => (rest, false),
    };
    let rest = rest.strip_prefix(':')?;
    let (reversed, digits) = match rest.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, rest),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((opens, reversed, digits, closes))
}
