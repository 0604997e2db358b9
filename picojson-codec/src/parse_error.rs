// SPDX-License-Identifier: Apache-2.0

use crate::tokenizer;

/// What went wrong while parsing JSON text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input held no value, only whitespace or nothing at all.
    EmptyInput,
    /// The input ended in the middle of a value.
    Incomplete,
    /// Non-whitespace bytes followed a complete document.
    TrailingContent,
    /// The document does not start with a valid JSON value.
    InvalidRoot,
    /// A `true`, `false` or `null` literal was misspelled.
    InvalidToken,
    InvalidNumber,
    /// A raw control character appeared inside a string.
    UnescapedControlCharacter,
    /// An unknown `\x` escape inside a string.
    InvalidStringEscape,
    /// A non-hex digit inside a `\uXXXX` escape.
    InvalidUnicodeEscape,
    /// A `\u` escape named a lone or unpaired surrogate.
    InvalidUnicodeCodepoint,
    TrailingComma,
    /// A `]` closed an object or a `}` closed an array.
    MismatchedBracket,
    ExpectedObjectKey,
    ExpectedColon,
    ExpectedObjectValue,
    ExpectedArrayItem,
    ExpectedCommaOrEnd,
    /// String content was not valid UTF-8.
    InvalidUtf8,
    /// A float literal does not fit a finite `f64`.
    NumberOutOfRange,
    /// The parser reached a state that valid tokenizer output cannot produce.
    UnexpectedState,
}

impl core::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ParseErrorKind::EmptyInput => "empty input",
            ParseErrorKind::Incomplete => "unexpected end of input",
            ParseErrorKind::TrailingContent => "trailing content after document",
            ParseErrorKind::InvalidRoot => "invalid value",
            ParseErrorKind::InvalidToken => "invalid literal",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::UnescapedControlCharacter => "unescaped control character in string",
            ParseErrorKind::InvalidStringEscape => "invalid escape sequence",
            ParseErrorKind::InvalidUnicodeEscape => "invalid hex digit in unicode escape",
            ParseErrorKind::InvalidUnicodeCodepoint => "invalid unicode codepoint",
            ParseErrorKind::TrailingComma => "trailing comma",
            ParseErrorKind::MismatchedBracket => "mismatched closing bracket",
            ParseErrorKind::ExpectedObjectKey => "expected object key",
            ParseErrorKind::ExpectedColon => "expected ':'",
            ParseErrorKind::ExpectedObjectValue => "expected object value",
            ParseErrorKind::ExpectedArrayItem => "expected array item",
            ParseErrorKind::ExpectedCommaOrEnd => "expected ',' or closing bracket",
            ParseErrorKind::InvalidUtf8 => "invalid UTF-8 in string",
            ParseErrorKind::NumberOutOfRange => "number out of range",
            ParseErrorKind::UnexpectedState => "internal parser state error",
        };
        f.write_str(text)
    }
}

/// A parse failure, located by byte offset from the start of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    /// The offending byte, if the error was not caused by end of input
    pub byte: Option<u8>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            byte: None,
        }
    }

    pub fn at_byte(kind: ParseErrorKind, offset: usize, byte: u8) -> Self {
        Self {
            kind,
            offset,
            byte: Some(byte),
        }
    }
}

impl From<tokenizer::Error> for ParseError {
    fn from(err: tokenizer::Error) -> Self {
        use tokenizer::ErrKind;
        let kind = match err.kind() {
            ErrKind::EmptyStream => ParseErrorKind::EmptyInput,
            ErrKind::UnfinishedStream => ParseErrorKind::Incomplete,
            ErrKind::InvalidRoot => ParseErrorKind::InvalidRoot,
            ErrKind::InvalidToken => ParseErrorKind::InvalidToken,
            ErrKind::UnescapedControlCharacter => ParseErrorKind::UnescapedControlCharacter,
            ErrKind::TrailingComma => ParseErrorKind::TrailingComma,
            ErrKind::ContentEnded => ParseErrorKind::TrailingContent,
            ErrKind::MismatchedClose => ParseErrorKind::MismatchedBracket,
            ErrKind::InvalidNumber => ParseErrorKind::InvalidNumber,
            ErrKind::InvalidUnicodeEscape => ParseErrorKind::InvalidUnicodeEscape,
            ErrKind::InvalidStringEscape => ParseErrorKind::InvalidStringEscape,
            ErrKind::ExpectedObjectKey => ParseErrorKind::ExpectedObjectKey,
            ErrKind::ExpectedObjectValue => ParseErrorKind::ExpectedObjectValue,
            ErrKind::ExpectedColon => ParseErrorKind::ExpectedColon,
            ErrKind::ExpectedArrayItem => ParseErrorKind::ExpectedArrayItem,
            ErrKind::ExpectedCommaOrEnd => ParseErrorKind::ExpectedCommaOrEnd,
        };
        Self {
            kind,
            offset: err.position(),
            byte: err.character(),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.byte {
            Some(byte) if byte.is_ascii_graphic() => write!(
                f,
                "{} at offset {} (found '{}')",
                self.kind, self.offset, byte as char
            ),
            _ => write!(f, "{} at offset {}", self.kind, self.offset),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn tokenize_error(input: &[u8]) -> ParseError {
        let mut tokenizer = Tokenizer::new();
        let mut sink = |_: tokenizer::Event, _: usize| {};
        match tokenizer.parse_chunk(input, &mut sink) {
            Err(e) => e.into(),
            Ok(_) => match tokenizer.finish(&mut sink) {
                Err(e) => e.into(),
                Ok(_) => panic!("Expected {:?} to fail", input),
            },
        }
    }

    #[test]
    fn test_tokenizer_error_conversion() {
        let err = tokenize_error(b"[1,]");
        assert_eq!(
            err,
            ParseError::at_byte(ParseErrorKind::TrailingComma, 3, b']')
        );

        let err = tokenize_error(b"1 2");
        assert_eq!(err.kind, ParseErrorKind::TrailingContent);
        assert_eq!(err.offset, 2);

        let err = tokenize_error(b"   ");
        assert_eq!(err, ParseError::new(ParseErrorKind::EmptyInput, 3));

        let err = tokenize_error(b"{\"a\":");
        assert_eq!(err, ParseError::new(ParseErrorKind::Incomplete, 5));
    }

    #[test]
    fn test_display_includes_offset() {
        let err = ParseError::at_byte(ParseErrorKind::MismatchedBracket, 2, b'}');
        assert_eq!(
            err.to_string(),
            "mismatched closing bracket at offset 2 (found '}')"
        );
        let err = ParseError::new(ParseErrorKind::Incomplete, 10);
        assert_eq!(err.to_string(), "unexpected end of input at offset 10");
        let err = ParseError::at_byte(ParseErrorKind::UnescapedControlCharacter, 1, b'\n');
        assert_eq!(
            err.to_string(),
            "unescaped control character in string at offset 1"
        );
    }
}
