//! Pull-based event parser for SOSI.

use std::io::{self, Read};

use sosi_encoding::{CharDecoder, Charset, CharsetStatus, DETECT_PREFIX_LEN};
use sosi_tokenizer::{CharSource, Location, Number, ReferenceNumber, Token, TokenKind, Tokenizer};
use tracing::{trace, warn};

use crate::{Event, GrammarError, ParseError, ParserFeatures, StateError};

/// Name of the head element.
pub const HEAD_NAME: &str = "HODE";
/// Name of the element that ends a document.
pub const END_NAME: &str = "SLUTT";

const ELEMENT_NAME: &[TokenKind] = &[TokenKind::ElementName];

/// Parser state for one nesting level.
#[derive(Debug, Clone)]
enum Context {
    /// Outside every element.
    None,
    /// Inside an element.
    Element {
        name: String,
        location: Location,
        is_head: bool,
        /// The next token must be the element name.
        first_token: bool,
        /// A value or child has been seen.
        has_content: bool,
    },
}

impl Context {
    fn element(location: Location) -> Self {
        Context::Element {
            name: String::new(),
            location,
            is_head: false,
            first_token: true,
            has_content: false,
        }
    }
}

/// Pull-based event parser for SOSI.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    features: ParserFeatures,
    charset: Charset,
    charset_status: CharsetStatus,
    stack: Vec<Context>,
    /// Levels still to close after the one just closed.
    pending_closes: usize,
    /// The level marker that triggered closing, replayed once closing is done.
    pending_level: Option<Token>,
    head_seen: bool,
    /// The last value event was a string.
    after_string: bool,
    /// An `&` waiting for its right-hand string.
    open_concatenation: Option<Location>,
    island_open: bool,
    current: Option<Event>,
    done: bool,
}

impl<'a> Parser<'a> {
    /// Create a strict parser over already-decoded text.
    pub fn new(source: &'a str) -> Self {
        Self::with_features(source, ParserFeatures::default())
    }

    /// Create a parser over already-decoded text.
    pub fn with_features(source: &'a str, features: ParserFeatures) -> Self {
        Self::from_tokenizer(
            Tokenizer::from_text(source),
            features,
            Charset::Utf8,
            CharsetStatus::Assumed,
        )
    }

    /// Create a parser over a decoded character stream in `charset`.
    pub fn from_chars<I>(chars: I, charset: Charset, features: ParserFeatures) -> Self
    where
        I: Iterator<Item = io::Result<char>> + 'a,
    {
        Self::from_tokenizer(
            Tokenizer::new(CharSource::from_chars(chars)),
            features,
            charset,
            CharsetStatus::Assumed,
        )
    }

    /// Create a parser over raw bytes, detecting the charset from the first
    /// [`DETECT_PREFIX_LEN`] bytes.
    pub fn from_reader<R: Read + 'a>(
        mut reader: R,
        features: ParserFeatures,
    ) -> Result<Self, ParseError> {
        let mut prefix = Vec::with_capacity(DETECT_PREFIX_LEN);
        (&mut reader)
            .take(DETECT_PREFIX_LEN as u64)
            .read_to_end(&mut prefix)
            .map_err(|e| ParseError::io(e, Location::START))?;

        let detection = sosi_encoding::inspect(&prefix);
        let mut head = io::Cursor::new(prefix);
        head.set_position(detection.skip as u64);
        let decoder = CharDecoder::new(head.chain(reader), detection.charset);

        Ok(Self::from_tokenizer(
            Tokenizer::new(CharSource::from_chars(decoder)),
            features,
            detection.charset,
            detection.status,
        ))
    }

    fn from_tokenizer(
        tokenizer: Tokenizer<'a>,
        features: ParserFeatures,
        charset: Charset,
        charset_status: CharsetStatus,
    ) -> Self {
        Self {
            tokenizer,
            features,
            charset,
            charset_status,
            stack: vec![Context::None],
            pending_closes: 0,
            pending_level: None,
            head_seen: false,
            after_string: false,
            open_concatenation: None,
            island_open: false,
            current: None,
            done: false,
        }
    }

    /// The charset the input is decoded with.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// How the charset was determined.
    pub fn charset_status(&self) -> &CharsetStatus {
        &self.charset_status
    }

    /// The active feature flags.
    pub fn features(&self) -> ParserFeatures {
        self.features
    }

    /// Location of the most recent token.
    pub fn location(&self) -> Location {
        self.tokenizer.location()
    }

    /// Whether `next_event` can be called again.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Stop parsing and release the input buffer.
    pub fn close(&mut self) {
        self.done = true;
        self.tokenizer.close();
    }

    /// Get the next event from the parser.
    pub fn next_event(&mut self) -> Result<Event, ParseError> {
        if self.done {
            return Err(ParseError::state(
                StateError::NoMoreEvents,
                self.tokenizer.location(),
            ));
        }
        match self.advance() {
            Ok(event) => {
                trace!("Event {} at {}", event.kind_name(), event.location());
                if matches!(event, Event::End { .. }) {
                    self.close();
                }
                self.current = Some(event.clone());
                Ok(event)
            }
            Err(error) => {
                self.close();
                Err(error)
            }
        }
    }

    /// Parse all events into a vector, stopping at the first error.
    pub fn parse_to_vec(mut self) -> Result<Vec<Event>, ParseError> {
        let mut events = Vec::new();
        while self.has_next() {
            events.push(self.next_event()?);
        }
        Ok(events)
    }

    /// Nesting depth of the innermost open element.
    fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Advance the state machine.
    fn advance(&mut self) -> Result<Event, ParseError> {
        if self.pending_closes > 0 {
            self.pending_closes -= 1;
            let location = self
                .pending_level
                .as_ref()
                .map_or(self.tokenizer.location(), |t| t.location);
            return Ok(self.close_element(location));
        }

        loop {
            let token = match self.pending_level.take() {
                Some(token) => token,
                None => self.tokenizer.next_token()?,
            };

            if token.kind == TokenKind::Comment {
                return Ok(Event::Comment {
                    text: token.comment_text().to_string(),
                    location: token.location,
                });
            }

            match self.stack.last() {
                Some(Context::Element { first_token, .. }) => {
                    if *first_token {
                        return self.element_name(token);
                    }
                    if let Some(event) = self.element_content(token)? {
                        return Ok(event);
                    }
                }
                Some(Context::None) | None => self.expect_level(token)?,
            }
        }
    }

    /// Outside every element only a first-level marker is allowed.
    fn expect_level(&mut self, token: Token) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Level if token.level() == 1 => {
                self.stack.push(Context::element(token.location));
                Ok(())
            }
            TokenKind::Level => Err(ParseError::grammar(
                GrammarError::LevelLeap {
                    from: 0,
                    to: token.level(),
                },
                token.location,
            )),
            TokenKind::Eof if self.head_seen => {
                Err(ParseError::grammar(GrammarError::UnexpectedEof, token.location))
            }
            found => Err(ParseError::grammar(
                GrammarError::ExpectedLevel { found },
                token.location,
            )),
        }
    }

    /// The first token after a level marker names the element.
    fn element_name(&mut self, token: Token) -> Result<Event, ParseError> {
        match token.kind {
            TokenKind::ElementName => {}
            TokenKind::Eof => {
                return Err(ParseError::grammar(
                    GrammarError::UnexpectedEof,
                    token.location,
                ));
            }
            found => {
                return Err(ParseError::grammar(
                    GrammarError::UnexpectedToken {
                        found,
                        expected: ELEMENT_NAME,
                    },
                    token.location,
                ));
            }
        }

        let location = token.location;
        let name = token.text;
        let top_level = self.depth() == 1;

        if top_level && name.eq_ignore_ascii_case(END_NAME) {
            if !self.head_seen {
                return Err(ParseError::grammar(
                    GrammarError::HeadNotFirst { name },
                    location,
                ));
            }
            self.stack.pop();
            return Ok(Event::End { location });
        }

        let is_head = top_level && name.eq_ignore_ascii_case(HEAD_NAME);
        if is_head {
            if self.head_seen {
                return Err(ParseError::grammar(GrammarError::DuplicateHead, location));
            }
            self.check_charset(location)?;
            self.head_seen = true;
        } else if top_level && !self.head_seen {
            return Err(ParseError::grammar(
                GrammarError::HeadNotFirst { name },
                location,
            ));
        }

        if let Some(Context::Element {
            name: context_name,
            location: context_location,
            is_head: context_is_head,
            first_token,
            ..
        }) = self.stack.last_mut()
        {
            *context_name = name.clone();
            *context_location = location;
            *context_is_head = is_head;
            *first_token = false;
        }

        Ok(if is_head {
            Event::StartHead { name, location }
        } else {
            Event::StartElement { name, location }
        })
    }

    /// Apply the charset policy when the head opens.
    fn check_charset(&self, location: Location) -> Result<(), ParseError> {
        let strict = !self.features.allow_invalid_charset;
        match &self.charset_status {
            CharsetStatus::Missing if strict => Err(ParseError::grammar(
                GrammarError::MissingCharset,
                location,
            )),
            CharsetStatus::Invalid(declared) if strict => Err(ParseError::grammar(
                GrammarError::InvalidCharset {
                    declared: declared.clone(),
                },
                location,
            )),
            status if status.is_problem() => {
                warn!("charset {:?}, decoding as {}", status, self.charset);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Handle a token inside an element. Returns `None` when the token
    /// produced no event (descending into a child).
    fn element_content(&mut self, token: Token) -> Result<Option<Event>, ParseError> {
        let location = token.location;
        match token.kind {
            TokenKind::Level => self.level(token),
            TokenKind::Eof => Err(ParseError::grammar(GrammarError::UnexpectedEof, location)),
            TokenKind::ElementName | TokenKind::Comment => Err(ParseError::grammar(
                GrammarError::UnexpectedToken {
                    found: token.kind,
                    expected: ELEMENT_CONTENT,
                },
                location,
            )),
            TokenKind::String => {
                self.check_island_closed(location)?;
                self.open_concatenation = None;
                self.after_string = true;
                self.mark_content();
                Ok(Some(Event::String {
                    value: token.unescaped().into_owned(),
                    location,
                }))
            }
            TokenKind::Ampersand => {
                if !self.after_string {
                    return Err(ParseError::grammar(
                        GrammarError::InvalidConcatenation,
                        location,
                    ));
                }
                self.after_string = false;
                self.open_concatenation = Some(location);
                Ok(Some(Event::Concatenation { location }))
            }
            kind => {
                if self.open_concatenation.is_some() {
                    return Err(ParseError::grammar(
                        GrammarError::InvalidConcatenation,
                        location,
                    ));
                }
                self.after_string = false;
                self.mark_content();
                let event = match kind {
                    TokenKind::Number => {
                        self.check_island_closed(location)?;
                        let value = token.number().ok_or_else(|| out_of_range(&token))?;
                        Event::Number { value, location }
                    }
                    TokenKind::SerialNumber => {
                        self.check_island_closed(location)?;
                        let value = token.serial_number().ok_or_else(|| out_of_range(&token))?;
                        Event::SerialNumber { value, location }
                    }
                    TokenKind::Reference => self.reference(&token)?,
                    TokenKind::Asterisk => {
                        self.check_island_closed(location)?;
                        Event::Unspecified { location }
                    }
                    _ => {
                        self.check_island_closed(location)?;
                        Event::Default { location }
                    }
                };
                Ok(Some(event))
            }
        }
    }

    /// A level marker inside an element: descend, or close one or more levels.
    fn level(&mut self, token: Token) -> Result<Option<Event>, ParseError> {
        let location = token.location;
        if self.open_concatenation.is_some() {
            return Err(ParseError::grammar(
                GrammarError::InvalidConcatenation,
                location,
            ));
        }
        self.check_island_closed(location)?;
        self.after_string = false;

        let depth = self.depth();
        let to = token.level();
        if to == depth + 1 {
            self.mark_content();
            self.stack.push(Context::element(location));
            return Ok(None);
        }
        if to > depth + 1 {
            return Err(ParseError::grammar(
                GrammarError::LevelLeap { from: depth, to },
                location,
            ));
        }

        if let Some(Context::Element {
            name,
            location: element_location,
            has_content: false,
            ..
        }) = self.stack.last()
        {
            if !self.features.allow_empty_elements {
                return Err(ParseError::grammar(
                    GrammarError::EmptyElement { name: name.clone() },
                    *element_location,
                ));
            }
            warn!("empty element {} at {}", name, element_location);
        }

        self.pending_closes = depth - to;
        self.pending_level = Some(token);
        Ok(Some(self.close_element(location)))
    }

    fn reference(&mut self, token: &Token) -> Result<Event, ParseError> {
        let literal = token.reference().ok_or_else(|| out_of_range(token))?;
        if literal.opens_island {
            if self.island_open {
                return Err(ParseError::grammar(
                    GrammarError::MisplacedIslandMarker,
                    token.location,
                ));
            }
            self.island_open = true;
        }
        let inside_island = self.island_open;
        if literal.closes_island {
            if !self.island_open {
                return Err(ParseError::grammar(
                    GrammarError::MisplacedIslandMarker,
                    token.location,
                ));
            }
            self.island_open = false;
        }
        Ok(Event::Reference {
            value: ReferenceNumber {
                number: literal.number,
                inside_island,
                reversed: literal.reversed,
            },
            opens_island: literal.opens_island,
            closes_island: literal.closes_island,
            location: token.location,
        })
    }

    fn check_island_closed(&self, location: Location) -> Result<(), ParseError> {
        if self.island_open {
            Err(ParseError::grammar(GrammarError::UnclosedIsland, location))
        } else {
            Ok(())
        }
    }

    fn mark_content(&mut self) {
        if let Some(Context::Element { has_content, .. }) = self.stack.last_mut() {
            *has_content = true;
        }
    }

    fn close_element(&mut self, location: Location) -> Event {
        self.after_string = false;
        match self.stack.pop() {
            Some(Context::Element { is_head: true, .. }) => Event::EndHead { location },
            _ => Event::EndElement { location },
        }
    }

    // Accessors for the most recent event.

    /// The most recent event.
    pub fn current(&self) -> Option<&Event> {
        self.current.as_ref()
    }

    fn current_event(&self) -> Result<&Event, ParseError> {
        self.current.as_ref().ok_or_else(|| {
            ParseError::state(StateError::NoCurrentEvent, self.tokenizer.location())
        })
    }

    fn wrong_event(requested: &'static str, event: &Event) -> ParseError {
        ParseError::state(
            StateError::WrongEvent {
                requested,
                current: event.kind_name(),
            },
            event.location(),
        )
    }

    /// Name of the element just started.
    pub fn current_name(&self) -> Result<&str, ParseError> {
        match self.current_event()? {
            Event::StartHead { name, .. } | Event::StartElement { name, .. } => Ok(name),
            other => Err(Self::wrong_event("name", other)),
        }
    }

    /// The current string value.
    pub fn current_string(&self) -> Result<&str, ParseError> {
        match self.current_event()? {
            Event::String { value, .. } => Ok(value),
            other => Err(Self::wrong_event("string", other)),
        }
    }

    /// The current number value.
    pub fn current_number(&self) -> Result<&Number, ParseError> {
        match self.current_event()? {
            Event::Number { value, .. } => Ok(value),
            other => Err(Self::wrong_event("number", other)),
        }
    }

    /// The current serial number.
    pub fn current_serial_number(&self) -> Result<u64, ParseError> {
        match self.current_event()? {
            Event::SerialNumber { value, .. } => Ok(*value),
            other => Err(Self::wrong_event("serial number", other)),
        }
    }

    /// The current reference number.
    pub fn current_reference(&self) -> Result<ReferenceNumber, ParseError> {
        match self.current_event()? {
            Event::Reference { value, .. } => Ok(*value),
            other => Err(Self::wrong_event("reference", other)),
        }
    }

    /// The current comment text.
    pub fn current_comment(&self) -> Result<&str, ParseError> {
        match self.current_event()? {
            Event::Comment { text, .. } => Ok(text),
            other => Err(Self::wrong_event("comment", other)),
        }
    }
}

const ELEMENT_CONTENT: &[TokenKind] = &[
    TokenKind::Level,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::SerialNumber,
    TokenKind::Reference,
    TokenKind::Asterisk,
    TokenKind::AtMark,
    TokenKind::Ampersand,
];

fn out_of_range(token: &Token) -> ParseError {
    ParseError::grammar(
        GrammarError::NumberOutOfRange {
            text: token.text.clone(),
        },
        token.location,
    )
}

impl Iterator for Parser<'_> {
    type Item = Result<Event, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            None
        } else {
            Some(self.next_event())
        }
    }
}
