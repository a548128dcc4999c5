//! Lexical errors.

use std::io;

use thiserror::Error;

use crate::Location;

/// What went wrong while tokenizing.
#[derive(Debug, Error)]
pub enum LexErrorKind {
    /// End of input inside a quoted string.
    #[error("unterminated string, expected closing {quote}")]
    UnterminatedString {
        /// The quote character that would have closed the string.
        quote: char,
    },
    /// A character that cannot start the token expected here.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    /// The character source failed.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// A fatal tokenizer error.
#[derive(Debug, Error)]
#[error("{kind} at {location}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where it went wrong.
    pub location: Location,
}

impl LexError {
    /// Create a new lexical error.
    pub fn new(kind: LexErrorKind, location: Location) -> Self {
        Self { kind, location }
    }
}
