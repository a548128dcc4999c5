//! A streaming tokenizer for SOSI

mod location;
pub use location::Location;

mod token;
pub use token::{Token, TokenKind, classify};

mod number;
pub use number::{Number, NumberForm};

mod reference;
pub use reference::{ReferenceLiteral, ReferenceNumber};

mod pool;
pub use pool::BufferPool;

mod error;
pub use error::{LexError, LexErrorKind};

mod tokenizer;
pub use tokenizer::{CharSource, Tokenizer};
