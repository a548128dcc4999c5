//! Text-to-bytes encoding.

use crate::Charset;

/// Byte written for characters a charset cannot represent.
pub const DEFAULT_REPLACEMENT: u8 = b'?';

/// Encode `text` in `charset`, substituting `replacement` for unmappable characters.
pub fn encode_str(text: &str, charset: Charset, replacement: u8) -> Vec<u8> {
    if charset == Charset::Utf8 {
        return text.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        charset.encode_char(c, replacement, &mut out);
    }
    out
}
