//! Charset detection from a byte prefix.

use tracing::debug;

use crate::Charset;

/// How many leading bytes callers should hand to the detector.
pub const DETECT_PREFIX_LEN: usize = 1024;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const MARKER: &[u8] = b"..TEGNSETT";

/// A charset resolved from a byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    /// The resolved charset.
    pub charset: Charset,
    /// Leading bytes to skip before decoding (the byte-order mark).
    pub skip: usize,
}

/// Where the charset of a document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetStatus {
    /// A UTF-8 byte-order mark.
    ByteOrderMark,
    /// A recognized `..TEGNSETT` declaration.
    Declared,
    /// No declaration was found in the prefix.
    Missing,
    /// A declaration with an unknown value.
    Invalid(String),
    /// The caller supplied already-decoded text.
    Assumed,
}

impl CharsetStatus {
    /// Whether the charset had to be guessed.
    pub fn is_problem(&self) -> bool {
        matches!(self, CharsetStatus::Missing | CharsetStatus::Invalid(_))
    }
}

/// Full outcome of inspecting a prefix, with the fallback already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Charset to decode with.
    pub charset: Charset,
    /// Leading bytes to skip.
    pub skip: usize,
    /// How the charset was determined.
    pub status: CharsetStatus,
}

/// Resolve the charset of a SOSI byte stream from its prefix.
///
/// Returns `None` when there is neither a byte-order mark nor a recognized
/// `..TEGNSETT` declaration; what happens then is the caller's policy.
pub fn detect_charset(prefix: &[u8]) -> Option<Detected> {
    if prefix.starts_with(&UTF8_BOM) {
        return Some(Detected {
            charset: Charset::Utf8,
            skip: UTF8_BOM.len(),
        });
    }
    let declared = find_declaration(prefix)?;
    let charset = Charset::from_declaration(&String::from_utf8_lossy(declared))?;
    Some(Detected { charset, skip: 0 })
}

/// Inspect a prefix and fall back to [`Charset::FALLBACK`] when needed.
pub fn inspect(prefix: &[u8]) -> Detection {
    if prefix.starts_with(&UTF8_BOM) {
        debug!("found UTF-8 byte-order mark");
        return Detection {
            charset: Charset::Utf8,
            skip: UTF8_BOM.len(),
            status: CharsetStatus::ByteOrderMark,
        };
    }
    let detection = match find_declaration(prefix) {
        None => Detection {
            charset: Charset::FALLBACK,
            skip: 0,
            status: CharsetStatus::Missing,
        },
        Some(raw) => {
            let declared = String::from_utf8_lossy(raw).into_owned();
            match Charset::from_declaration(&declared) {
                Some(charset) => Detection {
                    charset,
                    skip: 0,
                    status: CharsetStatus::Declared,
                },
                None => Detection {
                    charset: Charset::FALLBACK,
                    skip: 0,
                    status: CharsetStatus::Invalid(declared),
                },
            }
        }
    };
    debug!(
        "charset {} ({:?}) from {}-byte prefix",
        detection.charset,
        detection.status,
        prefix.len()
    );
    detection
}

/// Find the raw value of the `..TEGNSETT` declaration, skipping comment lines.
///
/// Surrounding quotes are stripped; the bytes are otherwise undecoded.
pub fn find_declaration(prefix: &[u8]) -> Option<&[u8]> {
    let mut i = 0;
    let mut line_start = true;
    while i < prefix.len() {
        let b = prefix[i];
        match b {
            b'\n' | b'\r' => {
                line_start = true;
                i += 1;
            }
            b' ' | b'\t' => i += 1,
            b'!' if line_start => {
                while i < prefix.len() && prefix[i] != b'\n' && prefix[i] != b'\r' {
                    i += 1;
                }
            }
            _ => {
                line_start = false;
                if matches_marker(&prefix[i..]) {
                    return read_value(&prefix[i + MARKER.len()..]);
                }
                i += 1;
            }
        }
    }
    None
}

fn matches_marker(rest: &[u8]) -> bool {
    if rest.len() < MARKER.len() || !rest[..MARKER.len()].eq_ignore_ascii_case(MARKER) {
        return false;
    }
    // `..TEGNSETTX` is a different element.
    match rest.get(MARKER.len()) {
        None => true,
        Some(b) => b.is_ascii_whitespace(),
    }
}

fn read_value(rest: &[u8]) -> Option<&[u8]> {
    let start = rest.iter().position(|b| !b.is_ascii_whitespace())?;
    let rest = &rest[start..];
    let end = rest
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let token = &rest[..end];
    let token = match token {
        [q @ (b'"' | b'\''), inner @ .., last] if last == q => inner,
        _ => token,
    };
    if token.is_empty() { None } else { Some(token) }
}
