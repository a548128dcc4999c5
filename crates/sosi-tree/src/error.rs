//! Errors from building a document.

use sosi_parse::{Location, ParseError};
use thiserror::Error;

/// Error during document building.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The parser rejected the input.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The event stream broke an invariant the parser should have enforced.
    #[error("internal error: {message} at {location}")]
    Internal {
        /// What went wrong.
        message: String,
        /// Where the builder was.
        location: Location,
    },
    /// A programmatically assembled document is malformed.
    #[error("invalid document: {0}")]
    Invalid(String),
}

impl TreeError {
    pub(crate) fn internal(message: impl Into<String>, location: Location) -> Self {
        TreeError::Internal {
            message: message.into(),
            location,
        }
    }

    /// Where the error happened, if known.
    pub fn location(&self) -> Location {
        match self {
            TreeError::Parse(e) => e.location,
            TreeError::Internal { location, .. } => *location,
            TreeError::Invalid(_) => Location::UNKNOWN,
        }
    }

    /// The parse error, if the input was rejected.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            TreeError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
