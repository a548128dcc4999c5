//! Fixed byte/codepoint tables for the legacy charsets.
//!
//! Each codec is an override table on top of the identity mapping: bytes
//! missing from the table decode to the codepoint with the same value, and
//! characters up to U+00FF missing from the table encode to their low byte.
//! The two directions are deliberately not inverses of each other.

/// A single-byte codec backed by a constant override table.
#[derive(Debug)]
pub struct LegacyCodec {
    name: &'static str,
    mappings: &'static [(u8, char)],
    decode: [char; 256],
}

impl LegacyCodec {
    const fn new(name: &'static str, mappings: &'static [(u8, char)]) -> Self {
        Self {
            name,
            mappings,
            decode: decode_table(mappings),
        }
    }

    /// Name of the charset, as declared in `..TEGNSETT`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The override table as `(byte, char)` pairs.
    pub fn mappings(&self) -> &'static [(u8, char)] {
        self.mappings
    }

    /// Decode a byte. Unmapped bytes pass through unchanged.
    #[inline]
    pub fn decode(&self, byte: u8) -> char {
        self.decode[byte as usize]
    }

    /// Encode a character, substituting `replacement` when it has no byte.
    pub fn encode(&self, c: char, replacement: u8) -> u8 {
        if let Some(&(byte, _)) = self.mappings.iter().find(|(_, mapped)| *mapped == c) {
            return byte;
        }
        let cp = c as u32;
        if cp <= 0xFF { cp as u8 } else { replacement }
    }

    /// Decode a whole byte slice.
    pub fn decode_bytes(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode(b)).collect()
    }
}

const fn decode_table(mappings: &[(u8, char)]) -> [char; 256] {
    let mut table = ['\0'; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8 as char;
        i += 1;
    }
    let mut j = 0;
    while j < mappings.len() {
        let (byte, c) = mappings[j];
        table[byte as usize] = c;
        j += 1;
    }
    table
}

/// Norwegian 7-bit (ISO 646-NO).
pub static ND7: LegacyCodec = LegacyCodec::new("ND7", ND7_MAPPINGS);

/// DEC Norwegian/Danish 7-bit replacement set.
pub static DECN7: LegacyCodec = LegacyCodec::new("DECN7", DECN7_MAPPINGS);

/// Norwegian DOS, the letters of IBM code page 865.
pub static DOSN8: LegacyCodec = LegacyCodec::new("DOSN8", DOSN8_MAPPINGS);

/// Latin-6 (Nordic), where it differs from Latin-1.
pub static ISO_8859_10: LegacyCodec = LegacyCodec::new("ISO8859-10", ISO_8859_10_MAPPINGS);

const ND7_MAPPINGS: &[(u8, char)] = &[
    (0x5B, 'Æ'),
    (0x5C, 'Ø'),
    (0x5D, 'Å'),
    (0x7B, 'æ'),
    (0x7C, 'ø'),
    (0x7D, 'å'),
];

const DECN7_MAPPINGS: &[(u8, char)] = &[
    (0x40, 'Ä'),
    (0x5B, 'Æ'),
    (0x5C, 'Ø'),
    (0x5D, 'Å'),
    (0x5E, 'Ü'),
    (0x60, 'ä'),
    (0x7B, 'æ'),
    (0x7C, 'ø'),
    (0x7D, 'å'),
    (0x7E, 'ü'),
];

const DOSN8_MAPPINGS: &[(u8, char)] = &[
    (0x80, 'Ç'),
    (0x81, 'ü'),
    (0x82, 'é'),
    (0x83, 'â'),
    (0x84, 'ä'),
    (0x85, 'à'),
    (0x86, 'å'),
    (0x87, 'ç'),
    (0x88, 'ê'),
    (0x89, 'ë'),
    (0x8A, 'è'),
    (0x8B, 'ï'),
    (0x8C, 'î'),
    (0x8D, 'ì'),
    (0x8E, 'Ä'),
    (0x8F, 'Å'),
    (0x90, 'É'),
    (0x91, 'æ'),
    (0x92, 'Æ'),
    (0x93, 'ô'),
    (0x94, 'ö'),
    (0x95, 'ò'),
    (0x96, 'û'),
    (0x97, 'ù'),
    (0x98, 'ÿ'),
    (0x99, 'Ö'),
    (0x9A, 'Ü'),
    (0x9B, 'ø'),
    (0x9C, '£'),
    (0x9D, 'Ø'),
    (0x9E, '₧'),
    (0x9F, 'ƒ'),
    (0xA0, 'á'),
    (0xA1, 'í'),
    (0xA2, 'ó'),
    (0xA3, 'ú'),
    (0xA4, 'ñ'),
    (0xA5, 'Ñ'),
];

const ISO_8859_10_MAPPINGS: &[(u8, char)] = &[
    (0xA1, 'Ą'),
    (0xA2, 'Ē'),
    (0xA3, 'Ģ'),
    (0xA4, 'Ī'),
    (0xA5, 'Ĩ'),
    (0xA6, 'Ķ'),
    (0xA8, 'Ļ'),
    (0xA9, 'Đ'),
    (0xAA, 'Š'),
    (0xAB, 'Ŧ'),
    (0xAC, 'Ž'),
    (0xAE, 'Ū'),
    (0xAF, 'Ŋ'),
    (0xB1, 'ą'),
    (0xB2, 'ē'),
    (0xB3, 'ģ'),
    (0xB4, 'ī'),
    (0xB5, 'ĩ'),
    (0xB6, 'ķ'),
    (0xB8, 'ļ'),
    (0xB9, 'đ'),
    (0xBA, 'š'),
    (0xBB, 'ŧ'),
    (0xBC, 'ž'),
    (0xBD, '―'),
    (0xBE, 'ū'),
    (0xBF, 'ŋ'),
    (0xC0, 'Ā'),
    (0xC7, 'Į'),
    (0xC8, 'Č'),
    (0xCA, 'Ę'),
    (0xCC, 'Ė'),
    (0xD1, 'Ņ'),
    (0xD2, 'Ō'),
    (0xD7, 'Ũ'),
    (0xD9, 'Ų'),
    (0xE0, 'ā'),
    (0xE7, 'į'),
    (0xE8, 'č'),
    (0xEA, 'ę'),
    (0xEC, 'ė'),
    (0xF1, 'ņ'),
    (0xF2, 'ō'),
    (0xF7, 'ũ'),
    (0xF9, 'ų'),
    (0xFF, 'ĸ'),
];
