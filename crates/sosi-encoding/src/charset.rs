//! The charsets a SOSI file may declare.

use std::fmt;

use crate::codec::{self, LegacyCodec};

/// A character set recognized in a `..TEGNSETT` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// `UTF-8`
    Utf8,
    /// `ISO8859-1`, also declared as `ANSI`
    Latin1,
    /// `ISO8859-10`
    Latin6,
    /// `DOSN8`, the Norwegian DOS code page
    Dosn8,
    /// `ND7`, Norwegian 7-bit
    Nd7,
    /// `DECN7`, DEC Norwegian 7-bit
    Decn7,
}

impl Charset {
    /// All supported charsets.
    pub const ALL: [Charset; 6] = [
        Charset::Utf8,
        Charset::Latin1,
        Charset::Latin6,
        Charset::Dosn8,
        Charset::Nd7,
        Charset::Decn7,
    ];

    /// The charset used when a file declares nothing usable.
    pub const FALLBACK: Charset = Charset::Latin1;

    /// Map a declared `TEGNSETT` value onto a charset, ignoring case.
    pub fn from_declaration(token: &str) -> Option<Charset> {
        let token = token.trim();
        let known: &[(&str, Charset)] = &[
            ("UTF-8", Charset::Utf8),
            ("UTF8", Charset::Utf8),
            ("ANSI", Charset::Latin1),
            ("ISO8859-1", Charset::Latin1),
            ("ISO-8859-1", Charset::Latin1),
            ("ISO8859-10", Charset::Latin6),
            ("ISO-8859-10", Charset::Latin6),
            ("DOSN8", Charset::Dosn8),
            ("ND7", Charset::Nd7),
            ("DECN7", Charset::Decn7),
        ];
        known
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, charset)| *charset)
    }

    /// The canonical value written after `..TEGNSETT`.
    pub fn declaration(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO8859-1",
            Charset::Latin6 => "ISO8859-10",
            Charset::Dosn8 => "DOSN8",
            Charset::Nd7 => "ND7",
            Charset::Decn7 => "DECN7",
        }
    }

    /// The IANA-style name of the charset.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Latin6 => "ISO-8859-10",
            Charset::Dosn8 | Charset::Nd7 | Charset::Decn7 => self.declaration(),
        }
    }

    /// The table-driven codec behind this charset, if it has one.
    pub fn legacy(self) -> Option<&'static LegacyCodec> {
        match self {
            Charset::Utf8 | Charset::Latin1 => None,
            Charset::Latin6 => Some(&codec::ISO_8859_10),
            Charset::Dosn8 => Some(&codec::DOSN8),
            Charset::Nd7 => Some(&codec::ND7),
            Charset::Decn7 => Some(&codec::DECN7),
        }
    }

    /// Whether every character is stored as exactly one byte.
    #[inline]
    pub fn is_single_byte(self) -> bool {
        self != Charset::Utf8
    }

    /// Decode one byte of a single-byte charset.
    ///
    /// For UTF-8 only ASCII bytes decode to themselves; everything else is
    /// U+FFFD since a lone byte is not a complete sequence.
    pub fn decode_byte(self, byte: u8) -> char {
        match self {
            Charset::Utf8 if byte.is_ascii() => byte as char,
            Charset::Utf8 => char::REPLACEMENT_CHARACTER,
            Charset::Latin1 => byte as char,
            _ => match self.legacy() {
                Some(codec) => codec.decode(byte),
                None => byte as char,
            },
        }
    }

    /// Encode one character, appending the bytes to `out`.
    pub fn encode_char(self, c: char, replacement: u8, out: &mut Vec<u8>) {
        match self {
            Charset::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Charset::Latin1 => {
                let cp = c as u32;
                out.push(if cp <= 0xFF { cp as u8 } else { replacement });
            }
            _ => match self.legacy() {
                Some(codec) => out.push(codec.encode(c, replacement)),
                None => out.push(replacement),
            },
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_declarations_are_case_insensitive() {
        assert_eq!(Charset::from_declaration("utf-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_declaration("Ansi"), Some(Charset::Latin1));
        assert_eq!(
            Charset::from_declaration("iso8859-1"),
            Some(Charset::Latin1)
        );
        assert_eq!(
            Charset::from_declaration("ISO8859-10"),
            Some(Charset::Latin6)
        );
        assert_eq!(Charset::from_declaration("dosn8"), Some(Charset::Dosn8));
        assert_eq!(Charset::from_declaration("ND7"), Some(Charset::Nd7));
        assert_eq!(Charset::from_declaration("DecN7"), Some(Charset::Decn7));
        assert_eq!(Charset::from_declaration("XXX"), None);
        assert_eq!(Charset::from_declaration(""), None);
    }

    #[test]
    fn test_canonical_declaration_round_trips() {
        for charset in Charset::ALL {
            assert_eq!(
                Charset::from_declaration(charset.declaration()),
                Some(charset)
            );
        }
    }

    #[test]
    fn test_latin1_encode_replaces_wide_chars() {
        let mut out = Vec::new();
        Charset::Latin1.encode_char('ø', b'?', &mut out);
        Charset::Latin1.encode_char('€', b'?', &mut out);
        assert_eq!(out, vec![0xF8, b'?']);
    }

    #[test]
    fn test_utf8_decode_byte_only_handles_ascii() {
        assert_eq!(Charset::Utf8.decode_byte(b'A'), 'A');
        assert_eq!(Charset::Utf8.decode_byte(0xC3), char::REPLACEMENT_CHARACTER);
    }
}
