// SPDX-License-Identifier: Apache-2.0

//! Token-level JSON writer with optional pretty printing.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::config::MAX_INDENT;
use crate::{EncodeConfig, Error};

#[derive(Debug, Clone, Copy, PartialEq)]
enum GenState {
    /// Nothing written at this level yet
    Start,
    /// Object opened, no key yet
    MapStart,
    /// Expecting the next key after at least one member
    MapKey,
    /// Key written, expecting its value
    MapVal,
    ArrayStart,
    InArray,
    Complete,
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Accumulates one JSON document in memory.
///
/// The walker drives it in document order; it tracks separators and
/// indentation but does not validate that keys and values alternate.
pub(crate) struct Generator {
    out: Vec<u8>,
    indent: Option<usize>,
    max_depth: Option<usize>,
    stack: Vec<GenState>,
}

impl Generator {
    /// Fails with [`Error::Overflow`] when the indent is wider than [`MAX_INDENT`].
    pub fn new(config: &EncodeConfig) -> Result<Self, Error> {
        if let Some(width) = config.indent.filter(|&w| w > MAX_INDENT) {
            return Err(Error::Overflow(format!("indent {width}")));
        }
        Ok(Self {
            out: Vec::new(),
            indent: config.indent,
            max_depth: config.max_depth,
            stack: vec![GenState::Start],
        })
    }

    fn state(&self) -> GenState {
        self.stack.last().copied().unwrap_or(GenState::Complete)
    }

    fn set_state(&mut self, state: GenState) {
        if let Some(top) = self.stack.last_mut() {
            *top = state;
        }
    }

    /// Container nesting depth at the current write position
    fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    fn newline_and_indent(&mut self) -> Result<(), Error> {
        if let Some(width) = self.indent {
            let depth = self.depth();
            let end = width
                .checked_mul(depth)
                .and_then(|spaces| spaces.checked_add(self.out.len() + 1))
                .ok_or_else(|| Error::Overflow(format!("indent {width} at depth {depth}")))?;
            self.out.push(b'\n');
            self.out.resize(end, b' ');
        }
        Ok(())
    }

    /// Separator owed before the next value at this level
    fn before_value(&mut self) -> Result<(), Error> {
        match self.state() {
            GenState::MapVal => {
                self.out.push(b':');
                if self.indent.is_some() {
                    self.out.push(b' ');
                }
            }
            GenState::ArrayStart => self.newline_and_indent()?,
            GenState::InArray => {
                self.out.push(b',');
                self.newline_and_indent()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn after_value(&mut self) {
        let next = match self.state() {
            GenState::Start => GenState::Complete,
            GenState::MapVal => GenState::MapKey,
            GenState::ArrayStart | GenState::InArray => GenState::InArray,
            other => other,
        };
        self.set_state(next);
        if next == GenState::Complete && self.indent.is_some() {
            self.out.push(b'\n');
        }
    }

    fn open(&mut self, bracket: u8, state: GenState) -> Result<(), Error> {
        if let Some(limit) = self.max_depth {
            if self.depth() >= limit {
                return Err(Error::DepthExceeded { limit });
            }
        }
        self.before_value()?;
        self.out.push(bracket);
        self.stack.push(state);
        Ok(())
    }

    fn close(&mut self, bracket: u8) -> Result<(), Error> {
        let had_members = matches!(self.stack.pop(), Some(GenState::MapKey | GenState::InArray));
        if had_members {
            self.newline_and_indent()?;
        }
        self.out.push(bracket);
        self.after_value();
        Ok(())
    }

    pub fn map_open(&mut self) -> Result<(), Error> {
        self.open(b'{', GenState::MapStart)
    }

    pub fn map_close(&mut self) -> Result<(), Error> {
        self.close(b'}')
    }

    pub fn array_open(&mut self) -> Result<(), Error> {
        self.open(b'[', GenState::ArrayStart)
    }

    pub fn array_close(&mut self) -> Result<(), Error> {
        self.close(b']')
    }

    pub fn key(&mut self, key: &[u8]) -> Result<(), Error> {
        if self.state() == GenState::MapKey {
            self.out.push(b',');
        }
        self.newline_and_indent()?;
        self.write_escaped(key);
        self.set_state(GenState::MapVal);
        Ok(())
    }

    pub fn null(&mut self) -> Result<(), Error> {
        self.atom(b"null")
    }

    pub fn bool(&mut self, b: bool) -> Result<(), Error> {
        self.atom(if b { b"true" } else { b"false" })
    }

    pub fn integer(&mut self, value: &BigInt) -> Result<(), Error> {
        match value.to_i64() {
            Some(small) => {
                let mut buf = itoa::Buffer::new();
                self.atom(buf.format(small).as_bytes())
            }
            None => self.atom(value.to_string().as_bytes()),
        }
    }

    /// Write a float in shortest round-trip form. NaN and infinities have
    /// no JSON spelling.
    pub fn float(&mut self, value: f64) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::Overflow(value.to_string()));
        }
        let mut buf = ryu::Buffer::new();
        self.atom(buf.format_finite(value).as_bytes())
    }

    pub fn string(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.before_value()?;
        self.write_escaped(bytes);
        self.after_value();
        Ok(())
    }

    fn atom(&mut self, text: &[u8]) -> Result<(), Error> {
        self.before_value()?;
        self.out.extend_from_slice(text);
        self.after_value();
        Ok(())
    }

    /// Quote and escape. Bytes at or above 0x80 pass through untouched.
    fn write_escaped(&mut self, bytes: &[u8]) {
        self.out.push(b'"');
        let mut start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let escape: &[u8] = match byte {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x08 => b"\\b",
                0x0C => b"\\f",
                0x00..=0x1F => b"",
                _ => continue,
            };
            self.out.extend_from_slice(&bytes[start..i]);
            if escape.is_empty() {
                self.out.extend_from_slice(b"\\u00");
                self.out.push(HEX[usize::from(byte >> 4)]);
                self.out.push(HEX[usize::from(byte & 0xF)]);
            } else {
                self.out.extend_from_slice(escape);
            }
            start = i + 1;
        }
        self.out.extend_from_slice(&bytes[start..]);
        self.out.push(b'"');
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}
