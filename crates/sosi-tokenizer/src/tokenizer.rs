//! Tokenizer for the SOSI format.

use std::io;

use tracing::trace;

use crate::pool::DEFAULT_BUFFER_CAPACITY;
use crate::{BufferPool, LexError, LexErrorKind, Location, Token, TokenKind, classify};

/// Where the tokenizer reads its characters from.
pub struct CharSource<'a> {
    chars: Box<dyn Iterator<Item = io::Result<char>> + 'a>,
}

impl<'a> CharSource<'a> {
    /// Read from already-decoded text.
    pub fn from_text(text: &'a str) -> Self {
        Self {
            chars: Box::new(text.chars().map(Ok)),
        }
    }

    /// Read from a fallible character stream, such as a `CharDecoder`.
    pub fn from_chars<I>(chars: I) -> Self
    where
        I: Iterator<Item = io::Result<char>> + 'a,
    {
        Self {
            chars: Box::new(chars),
        }
    }
}

/// A tokenizer that produces tokens from a SOSI character stream.
///
/// Characters are read into a buffer taken from a [`BufferPool`]. Consumed
/// characters are shifted out on refill, and the buffer doubles when a
/// single token fills it. The buffer goes back to the pool on [`close`]
/// or drop.
///
/// [`close`]: Tokenizer::close
pub struct Tokenizer<'a> {
    source: CharSource<'a>,
    pool: &'static BufferPool,
    buf: Vec<char>,
    /// Index in `buf` where the current token starts.
    start: usize,
    /// Index in `buf` of the next unread character.
    pos: usize,
    eof: bool,

    line: u32,
    column: u32,
    offset: u32,
    prev_cr: bool,
    token_location: Location,

    /// The previous token was a level, so the next run is an element name.
    after_level: bool,
    closed: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer using the global buffer pool.
    pub fn new(source: CharSource<'a>) -> Self {
        Self::with_pool(source, BufferPool::global(), DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a tokenizer over already-decoded text.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(CharSource::from_text(text))
    }

    /// Create a tokenizer with an explicit pool and initial buffer capacity.
    pub fn with_pool(source: CharSource<'a>, pool: &'static BufferPool, capacity: usize) -> Self {
        Self {
            source,
            pool,
            buf: pool.take(capacity.max(1)),
            start: 0,
            pos: 0,
            eof: false,
            line: 1,
            column: 1,
            offset: 0,
            prev_cr: false,
            token_location: Location::START,
            after_level: false,
            closed: false,
        }
    }

    /// Location where the current token starts.
    #[inline]
    pub fn location(&self) -> Location {
        self.token_location
    }

    /// Location just past the last character read.
    #[inline]
    pub fn last_char_location(&self) -> Location {
        Location::new(self.line, self.column, self.offset)
    }

    /// Current buffer capacity, in characters.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Release the buffer back to the pool. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.eof = true;
        self.pool.recycle(std::mem::take(&mut self.buf));
        self.start = 0;
        self.pos = 0;
    }

    /// Shift out consumed characters, grow if needed, and read more.
    fn refill(&mut self) -> Result<(), LexError> {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.pos -= self.start;
            self.start = 0;
        }
        if self.buf.len() == self.buf.capacity() {
            let additional = self.buf.capacity().max(DEFAULT_BUFFER_CAPACITY);
            self.buf.reserve(additional);
            trace!("token buffer grown to {} chars", self.buf.capacity());
        }
        let room = self.buf.capacity() - self.buf.len();
        for _ in 0..room {
            match self.source.chars.next() {
                Some(Ok(c)) => self.buf.push(c),
                Some(Err(e)) => {
                    return Err(LexError::new(LexErrorKind::Io(e), self.last_char_location()));
                }
                None => {
                    self.eof = true;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&mut self) -> Result<Option<char>, LexError> {
        if self.pos >= self.buf.len() && !self.eof {
            self.refill()?;
        }
        Ok(self.buf.get(self.pos).copied())
    }

    /// Consume the character returned by the last `peek`.
    #[inline]
    fn advance(&mut self) {
        let Some(&c) = self.buf.get(self.pos) else {
            return;
        };
        self.pos += 1;
        // Positions past u32::MAX stick at the maximum.
        self.offset = self.offset.saturating_add(c.len_utf8() as u32);
        match c {
            '\r' => {
                self.line = self.line.saturating_add(1);
                self.column = 1;
                self.prev_cr = true;
            }
            '\n' => {
                // CRLF counts as one line break.
                if !self.prev_cr {
                    self.line = self.line.saturating_add(1);
                }
                self.column = 1;
                self.prev_cr = false;
            }
            _ => {
                self.column = self.column.saturating_add(1);
                self.prev_cr = false;
            }
        }
    }

    /// Create a token from the current token start to the current position.
    fn token(&self, kind: TokenKind) -> Token {
        let text: String = self.buf[self.start..self.pos].iter().collect();
        let token = Token::new(kind, text, self.token_location, self.last_char_location());
        trace!("Token {:?} at {}: {:?}", kind, token.location, token.text);
        token
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace()?;
        self.start = self.pos;
        self.token_location = self.last_char_location();

        let Some(c) = self.peek()? else {
            return Ok(self.token(TokenKind::Eof));
        };

        if c == '.' {
            while self.peek()? == Some('.') {
                self.advance();
            }
            self.after_level = true;
            return Ok(self.token(TokenKind::Level));
        }

        if self.after_level {
            self.after_level = false;
            return self.tokenize_element_name(c);
        }

        match c {
            '"' | '\'' => self.tokenize_quoted(c),
            '*' => self.single(TokenKind::Asterisk),
            '@' => self.single(TokenKind::AtMark),
            '&' => self.single(TokenKind::Ampersand),
            '!' => self.tokenize_comment(),
            _ => self.tokenize_bare(),
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek()? {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
            self.start = self.pos;
        }
        Ok(())
    }

    fn single(&mut self, kind: TokenKind) -> Result<Token, LexError> {
        self.advance();
        Ok(self.token(kind))
    }

    /// Consume up to the next whitespace character.
    fn consume_run(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek()? {
            if is_whitespace(c) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    fn tokenize_element_name(&mut self, first: char) -> Result<Token, LexError> {
        if matches!(first, '"' | '\'' | '*' | '@' | '&' | '!') {
            return Err(LexError::new(
                LexErrorKind::UnexpectedCharacter(first),
                self.last_char_location(),
            ));
        }
        self.consume_run()?;
        Ok(self.token(TokenKind::ElementName))
    }

    /// Tokenize a bare run and classify it.
    fn tokenize_bare(&mut self) -> Result<Token, LexError> {
        self.consume_run()?;
        let mut token = self.token(TokenKind::String);
        let (kind, form) = classify(&token.text);
        token.kind = kind;
        token.number_form = form;
        Ok(token)
    }

    /// Tokenize a quoted string; a doubled quote is an escaped quote.
    fn tokenize_quoted(&mut self, quote: char) -> Result<Token, LexError> {
        self.advance();
        loop {
            match self.peek()? {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString { quote },
                        self.last_char_location(),
                    ));
                }
                Some(c) if c == quote => {
                    self.advance();
                    if self.peek()? == Some(quote) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => self.advance(),
            }
        }
        Ok(self.token(TokenKind::String))
    }

    /// Tokenize a comment: `!` up to, not including, the line break.
    fn tokenize_comment(&mut self) -> Result<Token, LexError> {
        self.advance();
        while let Some(c) = self.peek()? {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        Ok(self.token(TokenKind::Comment))
    }
}

impl Drop for Tokenizer<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            other => Some(other),
        }
    }
}

#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::from_text(source)
            .map(|t| t.map(|t| (t.kind, t.text)).unwrap())
            .collect()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|(kind, _)| kind).collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    #[test]
    fn test_level_and_name() {
        assert_eq!(
            tokenize(".HODE ..TEGNSETT UTF-8"),
            vec![
                tok(TokenKind::Level, "."),
                tok(TokenKind::ElementName, "HODE"),
                tok(TokenKind::Level, ".."),
                tok(TokenKind::ElementName, "TEGNSETT"),
                tok(TokenKind::String, "UTF-8"),
            ]
        );
    }

    #[test]
    fn test_name_after_level_is_never_a_value() {
        // A name that looks like a number or reference is still a name.
        assert_eq!(
            kinds("..123 ..:4 ..5:"),
            vec![
                TokenKind::Level,
                TokenKind::ElementName,
                TokenKind::Level,
                TokenKind::ElementName,
                TokenKind::Level,
                TokenKind::ElementName,
            ]
        );
    }

    #[test]
    fn test_level_depth() {
        let token = Tokenizer::from_text("....PUNKT").next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Level);
        assert_eq!(token.level(), 4);
    }

    #[test]
    fn test_value_classification() {
        assert_eq!(
            kinds("12: :7 :-7 (:1 :2) 42 -1.5 1.5D3 tekst * @ &"),
            vec![
                TokenKind::SerialNumber,
                TokenKind::Reference,
                TokenKind::Reference,
                TokenKind::Reference,
                TokenKind::Reference,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::String,
                TokenKind::Asterisk,
                TokenKind::AtMark,
                TokenKind::Ampersand,
            ]
        );
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            tokenize(r#""Ola Nordmann" 'Kari' "si ""hei"" da""#),
            vec![
                tok(TokenKind::String, r#""Ola Nordmann""#),
                tok(TokenKind::String, "'Kari'"),
                tok(TokenKind::String, r#""si ""hei"" da""#),
            ]
        );
    }

    #[test]
    fn test_quoted_number_is_a_string() {
        assert_eq!(kinds("'123'"), vec![TokenKind::String]);
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            tokenize("..NAVN x ! kommentar her\n..ID 1"),
            vec![
                tok(TokenKind::Level, ".."),
                tok(TokenKind::ElementName, "NAVN"),
                tok(TokenKind::String, "x"),
                tok(TokenKind::Comment, "! kommentar her"),
                tok(TokenKind::Level, ".."),
                tok(TokenKind::ElementName, "ID"),
                tok(TokenKind::Number, "1"),
            ]
        );
    }

    #[test]
    fn test_line_counting() {
        let mut tokenizer = Tokenizer::from_text(".A 1\r\n.B 2\r.C 3\n.D 4");
        let mut lines = Vec::new();
        while let Some(token) = tokenizer.next() {
            let token = token.unwrap();
            if token.kind == TokenKind::Level {
                lines.push((token.location.line, token.location.column));
            }
        }
        assert_eq!(lines, vec![(1, 1), (2, 1), (3, 1), (4, 1)]);
    }

    #[test]
    fn test_offsets_are_utf8_bytes() {
        let mut tokenizer = Tokenizer::from_text("'æ' x");
        tokenizer.next_token().unwrap();
        let x = tokenizer.next_token().unwrap();
        assert_eq!(x.location, Location::new(1, 5, 5));
    }

    #[test]
    fn test_positions_saturate_instead_of_wrapping() {
        let mut tokenizer = Tokenizer::from_text("ab\nc");
        tokenizer.offset = u32::MAX - 1;
        tokenizer.column = u32::MAX;
        tokenizer.line = u32::MAX;
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.end, Location::new(u32::MAX, u32::MAX, u32::MAX));
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.location, Location::new(u32::MAX, 1, u32::MAX));
    }

    #[test]
    fn test_unsigned_leading_point_is_a_level() {
        assert_eq!(
            kinds("..A .5 -.5 +.5"),
            vec![
                TokenKind::Level,
                TokenKind::ElementName,
                TokenKind::Level,
                TokenKind::ElementName,
                TokenKind::Number,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::from_text("..NAVN 'Ola\n");
        tokenizer.next_token().unwrap();
        tokenizer.next_token().unwrap();
        let err = tokenizer.next_token().unwrap_err();
        assert!(matches!(
            err.kind,
            LexErrorKind::UnterminatedString { quote: '\'' }
        ));
        assert_eq!(err.location, Location::new(2, 1, 12));
        assert_eq!(tokenizer.location(), Location::new(1, 8, 7));
    }

    #[test]
    fn test_quote_cannot_start_element_name() {
        let mut tokenizer = Tokenizer::from_text(".'HODE'");
        tokenizer.next_token().unwrap();
        let err = tokenizer.next_token().unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::UnexpectedCharacter('\'')));
    }

    #[test]
    fn test_buffer_grows_for_long_tokens() {
        static POOL: BufferPool = BufferPool::disabled();
        let long = "x".repeat(100);
        let source = format!("'{long}' etter");
        let mut tokenizer = Tokenizer::with_pool(CharSource::from_text(&source), &POOL, 8);
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.unescaped(), long);
        assert!(tokenizer.buffer_capacity() >= 102);
        assert_eq!(tokenizer.next_token().unwrap().text, "etter");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_io_errors_are_wrapped() {
        let chars = vec![Ok('.'), Ok('A'), Err(io::Error::other("broken pipe"))];
        let mut tokenizer = Tokenizer::new(CharSource::from_chars(chars.into_iter()));
        // The failing read happens while filling the buffer for the first token.
        let err = tokenizer.next_token().unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::Io(_)));
    }

    #[test]
    fn test_close_returns_buffer_and_is_idempotent() {
        static POOL: BufferPool = BufferPool::new();
        let mut tokenizer = Tokenizer::with_pool(CharSource::from_text(".HODE"), &POOL, 16);
        tokenizer.next_token().unwrap();
        tokenizer.close();
        tokenizer.close();
        drop(tokenizer);
        assert_eq!(POOL.idle(), 1);
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(
            kinds("\u{FEFF}.HODE"),
            vec![TokenKind::Level, TokenKind::ElementName]
        );
    }
}
