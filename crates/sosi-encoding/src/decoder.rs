//! Streaming byte-to-char decoding.

use std::io::{self, Read};

use crate::Charset;

const CHUNK: usize = 8 * 1024;

/// Decodes characters from a byte reader in a fixed charset.
///
/// UTF-8 sequences split across reads are reassembled; malformed sequences
/// decode to U+FFFD one byte at a time.
pub struct CharDecoder<R> {
    reader: R,
    charset: Charset,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> CharDecoder<R> {
    /// Create a decoder over `reader`.
    pub fn new(reader: R, charset: Charset) -> Self {
        Self {
            reader,
            charset,
            buf: Vec::with_capacity(CHUNK),
            pos: 0,
            eof: false,
        }
    }

    /// The charset this decoder reads.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Ensure at least `n` unread bytes are buffered unless the input ends.
    fn fill(&mut self, n: usize) -> io::Result<()> {
        while self.buf.len() - self.pos < n && !self.eof {
            if self.pos > 0 {
                self.buf.drain(..self.pos);
                self.pos = 0;
            }
            let old_len = self.buf.len();
            self.buf.resize(old_len + CHUNK, 0);
            let read = loop {
                match self.reader.read(&mut self.buf[old_len..]) {
                    Ok(read) => break read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.buf.truncate(old_len);
                        return Err(e);
                    }
                }
            };
            self.buf.truncate(old_len + read);
            if read == 0 {
                self.eof = true;
            }
        }
        Ok(())
    }

    fn decode_utf8(&mut self) -> io::Result<Option<char>> {
        self.fill(1)?;
        let Some(&lead) = self.buf.get(self.pos) else {
            return Ok(None);
        };
        let width = utf8_width(lead);
        if width <= 1 {
            self.pos += 1;
            return Ok(Some(if width == 1 {
                lead as char
            } else {
                char::REPLACEMENT_CHARACTER
            }));
        }
        self.fill(width)?;
        let end = (self.pos + width).min(self.buf.len());
        match std::str::from_utf8(&self.buf[self.pos..end]) {
            Ok(s) => {
                self.pos = end;
                Ok(s.chars().next())
            }
            Err(_) => {
                self.pos += 1;
                Ok(Some(char::REPLACEMENT_CHARACTER))
            }
        }
    }

    fn decode_single(&mut self) -> io::Result<Option<char>> {
        self.fill(1)?;
        let Some(&byte) = self.buf.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        Ok(Some(self.charset.decode_byte(byte)))
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

impl<R: Read> Iterator for CharDecoder<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let decoded = if self.charset == Charset::Utf8 {
            self.decode_utf8()
        } else {
            self.decode_single()
        };
        decoded.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    /// Hands out one byte per read call to exercise split sequences.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&b, rest)) if !buf.is_empty() => {
                    buf[0] = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    fn decode_all<R: Read>(reader: R, charset: Charset) -> String {
        CharDecoder::new(reader, charset)
            .collect::<io::Result<String>>()
            .unwrap()
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let text = "..NAVN \"Blåbærsyltetøy €\"";
        assert_eq!(decode_all(Trickle(text.as_bytes()), Charset::Utf8), text);
    }

    #[test]
    fn test_invalid_utf8_becomes_replacement() {
        let bytes = [b'a', 0xFF, b'b', 0xC3];
        assert_eq!(decode_all(&bytes[..], Charset::Utf8), "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn test_legacy_charsets() {
        assert_eq!(decode_all(&b"s\x91r"[..], Charset::Dosn8), "sær");
        assert_eq!(decode_all(&b"s{r"[..], Charset::Nd7), "sær");
        assert_eq!(decode_all(&b"s\xE6r"[..], Charset::Latin1), "sær");
    }

    #[test]
    fn test_read_errors_surface() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }
        let mut decoder = CharDecoder::new(Broken, Charset::Latin1);
        assert!(matches!(decoder.next(), Some(Err(_))));
    }
}
