// SPDX-License-Identifier: Apache-2.0

//! Resumable byte-at-a-time JSON tokenizer.
//!
//! The tokenizer validates JSON grammar and reports where tokens begin and
//! end through a callback. It never buffers content: callers that need the
//! text of strings or numbers collect the bytes between `Begin` and `End`
//! themselves.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    String { state: Str, key: bool },
    Number { state: Num },
    Literal { literal: Literal, matched: usize },
    Object { expect: Object },
    Array { expect: Array },
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
enum Str {
    Normal,
    Escaping,
    /// Number of hex digits seen so far in a `\uXXXX` escape
    Unicode(u8),
}

#[derive(Debug, Clone, PartialEq)]
enum Num {
    Sign,
    LeadingZero,
    Integer,
    Decimal,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl Num {
    /// A number may only end in one of these states
    const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Num::LeadingZero | Num::Integer | Num::Fraction | Num::ExponentDigits
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    const fn text(&self) -> &'static [u8] {
        match self {
            Literal::True => b"true",
            Literal::False => b"false",
            Literal::Null => b"null",
        }
    }

    const fn token(&self) -> EventToken {
        match self {
            Literal::True => EventToken::True,
            Literal::False => EventToken::False,
            Literal::Null => EventToken::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Object {
    /// Right after `{`
    KeyOrEnd,
    /// Right after `,`
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, PartialEq)]
enum Array {
    /// Right after `[`
    ItemOrEnd,
    /// Right after `,`
    Item,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventToken {
    True,
    False,
    Null,
    String,
    Key,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(EventToken),
    End(EventToken),
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
}

#[derive(PartialEq)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    MismatchedClose,
    InvalidNumber,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedArrayItem,
    ExpectedCommaOrEnd,
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// The offending byte, or `None` for end-of-input errors
    pub fn character(&self) -> Option<u8> {
        match self.kind {
            ErrKind::EmptyStream | ErrKind::UnfinishedStream => None,
            _ => Some(self.character),
        }
    }

    /// Absolute byte offset into the input
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

pub struct Tokenizer {
    state: State,
    /// Total bytes consumed across all chunks
    consumed: usize,
    stack: Vec<Container>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            state: State::Idle,
            consumed: 0,
            stack: Vec::new(),
        }
    }

    /// Current container nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True once a complete root value has been seen
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Signals end of input.
    ///
    /// Emits the end of a root-level number, which has no delimiter to
    /// terminate it otherwise, and rejects empty or unfinished documents.
    pub fn finish<F>(&mut self, callback: &mut F) -> Result<usize, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        if !self.stack.is_empty() {
            return Error::new(ErrKind::UnfinishedStream, b' ', self.consumed);
        }
        match &self.state {
            State::Finished => Ok(self.consumed),
            State::Idle => Error::new(ErrKind::EmptyStream, b' ', self.consumed),
            State::Number { state } if state.is_terminal() => {
                callback(Event::End(EventToken::Number), self.consumed);
                self.state = State::Finished;
                Ok(self.consumed)
            }
            _ => Error::new(ErrKind::UnfinishedStream, b' ', self.consumed),
        }
    }

    /// Feeds a chunk of input. Positions passed to the callback are absolute
    /// offsets from the start of the first chunk.
    pub fn parse_chunk<F>(&mut self, data: &[u8], callback: &mut F) -> Result<usize, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        for &byte in data {
            let pos = self.consumed;
            self.state = self.step(byte, pos, callback)?;
            self.consumed = self.consumed.saturating_add(1);
        }
        Ok(self.consumed)
    }

    fn after_value(&self) -> State {
        match self.stack.last() {
            Some(Container::Object) => State::Object {
                expect: Object::CommaOrEnd,
            },
            Some(Container::Array) => State::Array {
                expect: Array::CommaOrEnd,
            },
            None => State::Finished,
        }
    }

    fn close<F>(&mut self, container: Container, byte: u8, pos: usize, callback: &mut F) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        if self.stack.last() != Some(&container) {
            return Error::new(ErrKind::MismatchedClose, byte, pos);
        }
        self.stack.pop();
        callback(
            match container {
                Container::Object => Event::ObjectEnd,
                Container::Array => Event::ArrayEnd,
            },
            pos,
        );
        Ok(self.after_value())
    }

    /// Starts a value at `byte`, or fails with `otherwise`
    fn begin_value<F>(
        &mut self,
        byte: u8,
        pos: usize,
        otherwise: ErrKind,
        callback: &mut F,
    ) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        let state = match byte {
            b'{' => {
                self.stack.push(Container::Object);
                callback(Event::ObjectStart, pos);
                State::Object {
                    expect: Object::KeyOrEnd,
                }
            }
            b'[' => {
                self.stack.push(Container::Array);
                callback(Event::ArrayStart, pos);
                State::Array {
                    expect: Array::ItemOrEnd,
                }
            }
            b'"' => {
                callback(Event::Begin(EventToken::String), pos);
                State::String {
                    state: Str::Normal,
                    key: false,
                }
            }
            b't' | b'f' | b'n' => {
                let literal = match byte {
                    b't' => Literal::True,
                    b'f' => Literal::False,
                    _ => Literal::Null,
                };
                callback(Event::Begin(literal.token()), pos);
                State::Literal {
                    literal,
                    matched: 1,
                }
            }
            b'-' | b'0'..=b'9' => {
                callback(Event::Begin(EventToken::Number), pos);
                let state = match byte {
                    b'-' => Num::Sign,
                    b'0' => Num::LeadingZero,
                    _ => Num::Integer,
                };
                State::Number { state }
            }
            _ => return Error::new(otherwise, byte, pos),
        };
        Ok(state)
    }

    fn begin_key<F>(&mut self, pos: usize, callback: &mut F) -> State
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        callback(Event::Begin(EventToken::Key), pos);
        State::String {
            state: Str::Normal,
            key: true,
        }
    }

    fn step<F>(&mut self, byte: u8, pos: usize, callback: &mut F) -> Result<State, Error>
    where
        F: FnMut(Event, usize) + ?Sized,
    {
        let state = match (&self.state, byte) {
            (State::Number { state }, _) => match (state, byte) {
                (Num::Sign, b'0') => State::Number {
                    state: Num::LeadingZero,
                },
                (Num::Sign, b'1'..=b'9') => State::Number {
                    state: Num::Integer,
                },
                (Num::Integer, b'0'..=b'9') => State::Number {
                    state: Num::Integer,
                },
                (Num::LeadingZero | Num::Integer, b'.') => State::Number {
                    state: Num::Decimal,
                },
                (Num::Decimal | Num::Fraction, b'0'..=b'9') => State::Number {
                    state: Num::Fraction,
                },
                (Num::LeadingZero | Num::Integer | Num::Fraction, b'e' | b'E') => State::Number {
                    state: Num::Exponent,
                },
                (Num::Exponent, b'+' | b'-') => State::Number {
                    state: Num::ExponentSign,
                },
                (Num::Exponent | Num::ExponentSign | Num::ExponentDigits, b'0'..=b'9') => {
                    State::Number {
                        state: Num::ExponentDigits,
                    }
                }
                (state, _) if state.is_terminal() => {
                    // The delimiter ends the number and is then handled by
                    // whatever state follows the completed value.
                    callback(Event::End(EventToken::Number), pos);
                    self.state = self.after_value();
                    return self.step(byte, pos, callback);
                }
                _ => return Error::new(ErrKind::InvalidNumber, byte, pos),
            },

            (State::String { state, key }, _) => {
                let key = *key;
                match (state, byte) {
                    (Str::Normal, b'"') if key => {
                        callback(Event::End(EventToken::Key), pos);
                        State::Object {
                            expect: Object::Colon,
                        }
                    }
                    (Str::Normal, b'"') => {
                        callback(Event::End(EventToken::String), pos);
                        self.after_value()
                    }
                    (Str::Normal, b'\\') => State::String {
                        state: Str::Escaping,
                        key,
                    },
                    (Str::Normal, b'\x00'..=b'\x1F') => {
                        return Error::new(ErrKind::UnescapedControlCharacter, byte, pos);
                    }
                    (Str::Normal, _) => State::String {
                        state: Str::Normal,
                        key,
                    },
                    (Str::Escaping, b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                        State::String {
                            state: Str::Normal,
                            key,
                        }
                    }
                    (Str::Escaping, b'u') => State::String {
                        state: Str::Unicode(0),
                        key,
                    },
                    (Str::Escaping, _) => {
                        return Error::new(ErrKind::InvalidStringEscape, byte, pos);
                    }
                    (Str::Unicode(seen), b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') => {
                        let state = if *seen == 3 {
                            Str::Normal
                        } else {
                            Str::Unicode(seen + 1)
                        };
                        State::String { state, key }
                    }
                    (Str::Unicode(_), _) => {
                        return Error::new(ErrKind::InvalidUnicodeEscape, byte, pos);
                    }
                }
            }

            (State::Literal { literal, matched }, _) => {
                let text = literal.text();
                if text.get(*matched) != Some(&byte) {
                    return Error::new(ErrKind::InvalidToken, byte, pos);
                }
                let matched = matched + 1;
                if matched == text.len() {
                    callback(Event::End(literal.token()), pos);
                    self.after_value()
                } else {
                    State::Literal {
                        literal: *literal,
                        matched,
                    }
                }
            }

            (_, byte) if is_whitespace(byte) => self.state.clone(),

            (State::Idle, _) => self.begin_value(byte, pos, ErrKind::InvalidRoot, callback)?,
            (State::Finished, _) => return Error::new(ErrKind::ContentEnded, byte, pos),

            (State::Object { expect }, _) => match (expect, byte) {
                (Object::KeyOrEnd | Object::Key, b'"') => self.begin_key(pos, callback),
                (Object::KeyOrEnd | Object::CommaOrEnd, b'}') => {
                    self.close(Container::Object, byte, pos, callback)?
                }
                (Object::Key, b'}') => return Error::new(ErrKind::TrailingComma, byte, pos),
                (Object::KeyOrEnd | Object::Key, _) => {
                    return Error::new(ErrKind::ExpectedObjectKey, byte, pos);
                }
                (Object::Colon, b':') => State::Object {
                    expect: Object::Value,
                },
                (Object::Colon, _) => return Error::new(ErrKind::ExpectedColon, byte, pos),
                (Object::Value, _) => {
                    self.begin_value(byte, pos, ErrKind::ExpectedObjectValue, callback)?
                }
                (Object::CommaOrEnd, b',') => State::Object {
                    expect: Object::Key,
                },
                (Object::CommaOrEnd, b']') => {
                    return Error::new(ErrKind::MismatchedClose, byte, pos);
                }
                (Object::CommaOrEnd, _) => {
                    return Error::new(ErrKind::ExpectedCommaOrEnd, byte, pos);
                }
            },

            (State::Array { expect }, _) => match (expect, byte) {
                (Array::ItemOrEnd | Array::CommaOrEnd, b']') => {
                    self.close(Container::Array, byte, pos, callback)?
                }
                (Array::Item, b']') => return Error::new(ErrKind::TrailingComma, byte, pos),
                (Array::ItemOrEnd | Array::Item, _) => {
                    self.begin_value(byte, pos, ErrKind::ExpectedArrayItem, callback)?
                }
                (Array::CommaOrEnd, b',') => State::Array {
                    expect: Array::Item,
                },
                (Array::CommaOrEnd, b'}') => {
                    return Error::new(ErrKind::MismatchedClose, byte, pos);
                }
                (Array::CommaOrEnd, _) => {
                    return Error::new(ErrKind::ExpectedCommaOrEnd, byte, pos);
                }
            },
        };
        Ok(state)
    }
}
