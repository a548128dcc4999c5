//! Pull-based event parser for SOSI.
//!
//! [`Parser`] turns a byte or character stream into a forward-only sequence
//! of [`Event`]s, enforcing the level-nesting and concatenation rules of the
//! format. Building a document tree from the events is left to `sosi-tree`.

pub use sosi_encoding::{Charset, CharsetStatus};
pub use sosi_tokenizer::{Location, Number, ReferenceNumber, Token, TokenKind, Tokenizer};

mod event;
pub use event::Event;

mod error;
pub use error::{GrammarError, ParseError, ParseErrorKind, StateError};

mod features;
pub use features::ParserFeatures;

mod parser;
pub use parser::{END_NAME, HEAD_NAME, Parser};
