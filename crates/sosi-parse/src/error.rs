//! Parse errors.
//!
//! Data errors (lexical and grammar) are kept apart from [`StateError`],
//! which means the parser API was used in the wrong order.

use std::io;

use sosi_tokenizer::{LexError, LexErrorKind, Location, TokenKind};
use thiserror::Error;

/// A violation of the SOSI grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Content before the first level marker.
    #[error("expected LEVEL, found {found}")]
    ExpectedLevel {
        /// The token actually found.
        found: TokenKind,
    },
    /// The first element is not `HODE`.
    #[error("head must come first, found element {name}")]
    HeadNotFirst {
        /// Name of the offending element.
        name: String,
    },
    /// A second `HODE`.
    #[error("duplicate head")]
    DuplicateHead,
    /// No `..TEGNSETT` declaration.
    #[error("missing charset declaration")]
    MissingCharset,
    /// A `..TEGNSETT` value that names no known charset.
    #[error("invalid charset declaration {declared:?}")]
    InvalidCharset {
        /// The declared value.
        declared: String,
    },
    /// A level deeper than one below the current element.
    #[error("level leap from {from} to {to}")]
    LevelLeap {
        /// Current depth.
        from: usize,
        /// Depth of the offending level marker.
        to: usize,
    },
    /// An element with neither values nor children.
    #[error("empty element {name}")]
    EmptyElement {
        /// Name of the empty element.
        name: String,
    },
    /// `&` not between two string values.
    #[error("invalid concatenation")]
    InvalidConcatenation,
    /// A token that is not allowed here.
    #[error("unexpected token {found}, expected one of {}", display_expected(.expected))]
    UnexpectedToken {
        /// The token actually found.
        found: TokenKind,
        /// Tokens that would have been accepted.
        expected: &'static [TokenKind],
    },
    /// Input ended before `SLUTT`.
    #[error("unexpected end of input, expected SLUTT")]
    UnexpectedEof,
    /// A reference island still open where the element ends.
    #[error("unclosed reference island")]
    UnclosedIsland,
    /// `(` inside an island, or `)` outside one.
    #[error("misplaced reference island marker")]
    MisplacedIslandMarker,
    /// A serial or reference number that does not fit in 64 bits.
    #[error("number out of range: {text}")]
    NumberOutOfRange {
        /// The literal.
        text: String,
    },
}

fn display_expected(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The parser was used in a state where the request does not apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// `next_event` after `End`, after an error, or after `close`.
    #[error("no more elements")]
    NoMoreEvents,
    /// An accessor was called before the first event.
    #[error("no current event")]
    NoCurrentEvent,
    /// An accessor that does not apply to the current event.
    #[error("{requested} is not available on {current}")]
    WrongEvent {
        /// What was asked for.
        requested: &'static str,
        /// Kind of the current event.
        current: &'static str,
    },
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// The tokenizer rejected the input.
    #[error("{0}")]
    Lexical(LexErrorKind),
    /// The token sequence violates the grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    /// The API was used in the wrong state.
    #[error(transparent)]
    State(#[from] StateError),
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// A fatal parse error with its location.
#[derive(Debug, Error)]
#[error("{kind} at {location}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub location: Location,
}

impl ParseError {
    /// Create a new error.
    pub fn new(kind: impl Into<ParseErrorKind>, location: Location) -> Self {
        Self {
            kind: kind.into(),
            location,
        }
    }

    /// A grammar error.
    pub fn grammar(error: GrammarError, location: Location) -> Self {
        Self::new(error, location)
    }

    /// A state error.
    pub fn state(error: StateError, location: Location) -> Self {
        Self::new(error, location)
    }

    /// An I/O error.
    pub fn io(error: io::Error, location: Location) -> Self {
        Self::new(ParseErrorKind::Io(error), location)
    }

    /// The grammar error, if this is one.
    pub fn as_grammar(&self) -> Option<&GrammarError> {
        match &self.kind {
            ParseErrorKind::Grammar(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the input was at fault (lexical or grammar error).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::Lexical(_) | ParseErrorKind::Grammar(_)
        )
    }

    /// Whether the caller misused the API.
    pub fn is_usage_error(&self) -> bool {
        matches!(self.kind, ParseErrorKind::State(_))
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        let kind = match error.kind {
            LexErrorKind::Io(e) => ParseErrorKind::Io(e),
            other => ParseErrorKind::Lexical(other),
        };
        Self {
            kind,
            location: error.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_messages() {
        let leap = ParseError::grammar(
            GrammarError::LevelLeap { from: 1, to: 3 },
            Location::new(2, 1, 6),
        );
        assert_eq!(
            leap.to_string(),
            "level leap from 1 to 3 at line 2, column 1"
        );

        let unexpected = GrammarError::UnexpectedToken {
            found: TokenKind::Eof,
            expected: &[TokenKind::Level, TokenKind::String],
        };
        assert_eq!(
            unexpected.to_string(),
            "unexpected token EOF, expected one of LEVEL, VALUE_STRING"
        );
    }

    #[test]
    fn test_classification() {
        let grammar = ParseError::grammar(GrammarError::DuplicateHead, Location::START);
        assert!(grammar.is_data_error());
        assert!(!grammar.is_usage_error());

        let state = ParseError::state(StateError::NoMoreEvents, Location::START);
        assert!(state.is_usage_error());
        assert!(!state.is_data_error());

        let io = ParseError::io(io::Error::other("gone"), Location::START);
        assert!(!io.is_data_error() && !io.is_usage_error());
    }

    #[test]
    fn test_lex_io_becomes_io_kind() {
        let lex = LexError::new(LexErrorKind::Io(io::Error::other("gone")), Location::START);
        let error = ParseError::from(lex);
        assert!(matches!(error.kind, ParseErrorKind::Io(_)));
    }
}
