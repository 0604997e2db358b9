// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ParseErrorKind;

/// Pure helpers for decoding JSON string escapes.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Map the character following a backslash to the byte it stands for.
    ///
    /// Returns `None` for `u`, which starts a unicode escape, and for
    /// anything that is not a valid escape.
    pub fn process_simple_escape(escape_char: u8) -> Option<u8> {
        match escape_char {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            _ => None,
        }
    }

    pub fn hex_value(byte: u8) -> Option<u32> {
        char::from(byte).to_digit(16)
    }

    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combine a UTF-16 surrogate pair into one scalar value
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Option<u32> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return None;
        }
        Some(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
    }
}

/// Collects the four hex digits of a `\uXXXX` escape and joins surrogate
/// pairs split over two consecutive escapes.
#[derive(Debug, Default)]
pub struct UnicodeEscapeCollector {
    codepoint: u32,
    digits: u8,
    pending_high_surrogate: Option<u32>,
}

impl UnicodeEscapeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new escape. A pending high surrogate survives.
    pub fn reset(&mut self) {
        self.codepoint = 0;
        self.digits = 0;
    }

    pub fn reset_all(&mut self) {
        self.reset();
        self.pending_high_surrogate = None;
    }

    /// Add one hex digit. Returns true once all four are collected.
    pub fn push_hex(&mut self, byte: u8) -> Result<bool, ParseErrorKind> {
        if self.digits >= 4 {
            return Err(ParseErrorKind::UnexpectedState);
        }
        let digit = EscapeProcessor::hex_value(byte).ok_or(ParseErrorKind::InvalidUnicodeEscape)?;
        self.codepoint = (self.codepoint << 4) | digit;
        self.digits += 1;
        Ok(self.digits == 4)
    }

    /// Write the completed escape as UTF-8.
    ///
    /// A high surrogate writes nothing and waits for its low half. A low
    /// surrogate with no high half before it is rejected.
    pub fn flush_into(&mut self, out: &mut Vec<u8>) -> Result<(), ParseErrorKind> {
        if self.digits != 4 {
            return Err(ParseErrorKind::UnexpectedState);
        }
        let codepoint = self.codepoint;
        self.reset();

        let scalar = match self.pending_high_surrogate.take() {
            Some(high) => EscapeProcessor::combine_surrogate_pair(high, codepoint)
                .ok_or(ParseErrorKind::InvalidUnicodeCodepoint)?,
            None if EscapeProcessor::is_high_surrogate(codepoint) => {
                self.pending_high_surrogate = Some(codepoint);
                return Ok(());
            }
            None => codepoint,
        };
        let ch = char::from_u32(scalar).ok_or(ParseErrorKind::InvalidUnicodeCodepoint)?;
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    /// True if a high surrogate is still waiting for its low half
    pub fn has_pending_high_surrogate(&self) -> bool {
        self.pending_high_surrogate.is_some()
    }
}
