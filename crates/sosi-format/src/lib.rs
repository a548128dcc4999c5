//! Writing SOSI documents.
//!
//! [`SosiWriter`] walks a [`sosi_tree::Document`] back to SOSI text. How each
//! value is spelled is decided by a [`ValueFormatter`]; where line breaks go
//! is decided by the [`Layout`] in [`FormatOptions`].

mod options;
mod scalar;
mod value_format;
mod writer;

pub use options::{FormatOptions, Layout};
pub use scalar::{can_be_bare, quote};
pub use value_format::{DefaultValueFormatter, ValueFormatter, plain_decimal};
pub use writer::SosiWriter;
