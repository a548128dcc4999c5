//! Character encodings for SOSI files.
//!
//! SOSI files declare their charset with a `..TEGNSETT` element in the head.
//! This crate finds that declaration in a byte prefix, maps it onto a
//! [`Charset`], and provides the decoders and encoders for the legacy
//! Norwegian 7/8-bit charsets that no general-purpose encoding library covers.

mod charset;
pub use charset::Charset;

pub mod codec;
pub use codec::LegacyCodec;

mod detect;
pub use detect::{
    CharsetStatus, DETECT_PREFIX_LEN, Detected, Detection, detect_charset, find_declaration,
    inspect,
};

mod decoder;
pub use decoder::CharDecoder;

mod encoder;
pub use encoder::{DEFAULT_REPLACEMENT, encode_str};
