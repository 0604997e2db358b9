// SPDX-License-Identifier: Apache-2.0

//! A SAX-style JSON push parser.
//!
//! Input arrives in arbitrary chunks through [`PushParser::write`]. Complete
//! events are delivered to a [`PushParserHandler`] as soon as they are known,
//! so a token split across two writes is reported once, with its escapes
//! decoded.

use log::trace;

use crate::escape_processor::{EscapeProcessor, UnicodeEscapeCollector};
use crate::parse_error::{ParseError, ParseErrorKind};
use crate::tokenizer::{self, Event, EventToken, Tokenizer};
use crate::{JsonNumber, ParseEvent};

/// Receives events from a [`PushParser`].
pub trait PushParserHandler<E> {
    /// Handles a single, complete JSON event.
    fn handle_event(&mut self, event: ParseEvent<'_>) -> Result<(), E>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParserState {
    Idle,
    ParsingString,
    ParsingKey,
    ParsingNumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EscapeState {
    None,
    InEscapeSequence,
    InUnicodeEscape,
}

/// An error that can occur during push-based parsing.
#[derive(Debug, PartialEq)]
pub enum PushParseError<E> {
    /// An error occurred within the parser itself.
    Parse(ParseError),
    /// An error was returned by the handler.
    Handler(E),
}

impl<E> From<tokenizer::Error> for PushParseError<E> {
    fn from(e: tokenizer::Error) -> Self {
        PushParseError::Parse(e.into())
    }
}

impl<E> From<ParseError> for PushParseError<E> {
    fn from(e: ParseError) -> Self {
        PushParseError::Parse(e)
    }
}

pub struct PushParser<H> {
    handler: H,
    tokenizer: Tokenizer,
    state: ParserState,
    escape_state: EscapeState,
    /// Decoded content of the string, key or number being read
    scratch: Vec<u8>,
    unicode: UnicodeEscapeCollector,
    /// Offset where the current content token began
    token_start: usize,
    /// Absolute offset of the next input byte
    position: usize,
}

impl<H> PushParser<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            tokenizer: Tokenizer::new(),
            state: ParserState::Idle,
            escape_state: EscapeState::None,
            scratch: Vec::new(),
            unicode: UnicodeEscapeCollector::new(),
            token_start: 0,
            position: 0,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Current container nesting depth
    pub fn depth(&self) -> usize {
        self.tokenizer.depth()
    }

    /// Total bytes accepted so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once the top-level value has been fully tokenized
    pub fn is_finished(&self) -> bool {
        self.tokenizer.is_finished()
    }

    /// Consumes the parser and returns the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Processes a chunk of input data.
    pub fn write<E>(&mut self, data: &[u8]) -> Result<(), PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        // The tokenizer never emits more than two events for one byte.
        let mut event_storage: [Option<(Event, usize)>; 2] = [None, None];

        for &byte in data {
            {
                let mut callback = create_tokenizer_callback(&mut event_storage);
                self.tokenizer.parse_chunk(&[byte], &mut callback)?;
            }

            let mut append_byte = true;
            while let Some((event, event_pos)) = take_first_event(&mut event_storage) {
                if !self.handle_event(event, event_pos)? {
                    append_byte = false;
                }
            }

            if append_byte {
                match self.state {
                    ParserState::ParsingString | ParserState::ParsingKey => {
                        self.accumulate(byte)?;
                    }
                    ParserState::ParsingNumber => self.scratch.push(byte),
                    ParserState::Idle => {}
                }
            }
            self.position = self.position.saturating_add(1);
        }
        Ok(())
    }

    /// Signals end of input, flushing a trailing root number and emitting
    /// [`ParseEvent::EndDocument`].
    pub fn finish<E>(&mut self) -> Result<(), PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        let mut event_storage: [Option<(Event, usize)>; 2] = [None, None];
        {
            let mut callback = create_tokenizer_callback(&mut event_storage);
            self.tokenizer.finish(&mut callback)?;
        }
        while let Some((event, event_pos)) = take_first_event(&mut event_storage) {
            self.handle_event(event, event_pos)?;
        }
        trace!("document complete after {} bytes", self.position);
        self.handler
            .handle_event(ParseEvent::EndDocument)
            .map_err(PushParseError::Handler)
    }

    /// Returns false if the current byte was consumed by the event
    fn handle_event<E>(&mut self, event: Event, pos: usize) -> Result<bool, PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        let mut should_append = true;
        self.state = match (self.state, event) {
            (ParserState::Idle, Event::Begin(EventToken::String)) => {
                should_append = false;
                self.start_content(pos);
                ParserState::ParsingString
            }
            (ParserState::Idle, Event::Begin(EventToken::Key)) => {
                should_append = false;
                self.start_content(pos);
                ParserState::ParsingKey
            }
            (ParserState::Idle, Event::Begin(EventToken::Number)) => {
                self.start_content(pos);
                ParserState::ParsingNumber
            }
            (ParserState::Idle, event) => {
                let parse_event = match event {
                    Event::ObjectStart => ParseEvent::MapStart,
                    Event::ObjectEnd => ParseEvent::MapEnd,
                    Event::ArrayStart => ParseEvent::ArrayStart,
                    Event::ArrayEnd => ParseEvent::ArrayEnd,
                    Event::End(EventToken::True) => ParseEvent::Bool(true),
                    Event::End(EventToken::False) => ParseEvent::Bool(false),
                    Event::End(EventToken::Null) => ParseEvent::Null,
                    // Literal starts carry no content
                    Event::Begin(_) => return Ok(true),
                    Event::End(_) => {
                        return Err(ParseError::new(ParseErrorKind::UnexpectedState, pos).into())
                    }
                };
                self.emit(parse_event)?;
                ParserState::Idle
            }
            (ParserState::ParsingString, Event::End(EventToken::String))
            | (ParserState::ParsingKey, Event::End(EventToken::Key)) => {
                should_append = false;
                self.emit_string(pos)?;
                ParserState::Idle
            }
            (ParserState::ParsingNumber, Event::End(EventToken::Number)) => {
                should_append = false;
                self.emit_number()?;
                ParserState::Idle
            }
            _ => return Err(ParseError::new(ParseErrorKind::UnexpectedState, pos).into()),
        };
        Ok(should_append)
    }

    fn start_content(&mut self, pos: usize) {
        self.scratch.clear();
        self.unicode.reset_all();
        self.escape_state = EscapeState::None;
        self.token_start = pos;
    }

    /// Append one byte of string content, decoding escapes as they complete.
    fn accumulate<E>(&mut self, byte: u8) -> Result<(), PushParseError<E>> {
        let pos = self.position;
        let fail = |kind| PushParseError::Parse(ParseError::at_byte(kind, pos, byte));
        match self.escape_state {
            EscapeState::None if byte == b'\\' => {
                self.escape_state = EscapeState::InEscapeSequence;
            }
            EscapeState::None => {
                if self.unicode.has_pending_high_surrogate() {
                    return Err(fail(ParseErrorKind::InvalidUnicodeCodepoint));
                }
                self.scratch.push(byte);
            }
            EscapeState::InEscapeSequence if byte == b'u' => {
                self.unicode.reset();
                self.escape_state = EscapeState::InUnicodeEscape;
            }
            EscapeState::InEscapeSequence => {
                if self.unicode.has_pending_high_surrogate() {
                    return Err(fail(ParseErrorKind::InvalidUnicodeCodepoint));
                }
                let unescaped = EscapeProcessor::process_simple_escape(byte)
                    .ok_or_else(|| fail(ParseErrorKind::InvalidStringEscape))?;
                self.scratch.push(unescaped);
                self.escape_state = EscapeState::None;
            }
            EscapeState::InUnicodeEscape => {
                if self.unicode.push_hex(byte).map_err(fail)? {
                    self.unicode.flush_into(&mut self.scratch).map_err(fail)?;
                    self.escape_state = EscapeState::None;
                }
            }
        }
        Ok(())
    }

    fn emit<E>(&mut self, event: ParseEvent<'_>) -> Result<(), PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        self.handler
            .handle_event(event)
            .map_err(PushParseError::Handler)
    }

    fn emit_string<E>(&mut self, pos: usize) -> Result<(), PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        if self.unicode.has_pending_high_surrogate() {
            return Err(ParseError::at_byte(ParseErrorKind::InvalidUnicodeCodepoint, pos, b'"').into());
        }
        let text = core::str::from_utf8(&self.scratch)
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidUtf8, self.token_start))?;
        let event = if self.state == ParserState::ParsingKey {
            ParseEvent::MapKey(text)
        } else {
            ParseEvent::String(text)
        };
        self.handler
            .handle_event(event)
            .map_err(PushParseError::Handler)
    }

    fn emit_number<E>(&mut self) -> Result<(), PushParseError<E>>
    where
        H: PushParserHandler<E>,
    {
        let start = self.token_start;
        // Number lexemes are pure ASCII once the tokenizer accepts them
        let raw = core::str::from_utf8(&self.scratch)
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start))?;
        let number = JsonNumber::from_lexeme(raw).map_err(|kind| ParseError::new(kind, start))?;
        self.handler
            .handle_event(ParseEvent::Number(number))
            .map_err(PushParseError::Handler)
    }
}

fn create_tokenizer_callback(
    event_storage: &mut [Option<(Event, usize)>; 2],
) -> impl FnMut(Event, usize) + '_ {
    move |event, pos| {
        if let Some(slot) = event_storage.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some((event, pos));
        }
    }
}

fn take_first_event(event_storage: &mut [Option<(Event, usize)>; 2]) -> Option<(Event, usize)> {
    event_storage.iter_mut().find_map(|e| e.take())
}
