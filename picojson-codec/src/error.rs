// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;

/// A value of the wrong kind was handed to the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Decoding needs a string or byte string
    ExpectedBytesOrString { found: &'static str },
    /// The value has no JSON representation
    UnsupportedValue { type_name: String },
    /// JSON object keys must be strings
    NonStringKey { type_name: &'static str },
    /// The indent must be an integer or absent
    InvalidIndent { found: &'static str },
    /// A string key and a byte string key with the same bytes in one mapping
    DuplicateKey { key: String },
}

impl core::fmt::Display for TypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TypeError::ExpectedBytesOrString { found } => {
                write!(f, "expected str or bytes, found {found}")
            }
            TypeError::UnsupportedValue { type_name } => {
                write!(f, "object of type {type_name} is not JSON serializable")
            }
            TypeError::NonStringKey { type_name } => {
                write!(f, "JSON object keys must be strings, found {type_name}")
            }
            TypeError::InvalidIndent { found } => {
                write!(f, "indent must be an integer or null, found {found}")
            }
            TypeError::DuplicateKey { key } => {
                write!(f, "key {key:?} appears more than once in one mapping")
            }
        }
    }
}

/// Errors returned by the codec
#[derive(Debug)]
pub enum Error {
    Type(TypeError),
    /// Malformed JSON text
    Parse(ParseError),
    /// A number that cannot be written as JSON, or an indent too wide to use
    Overflow(String),
    /// Nesting went past the configured limit
    DepthExceeded { limit: usize },
    /// The underlying reader or writer failed
    Io(std::io::Error),
}

impl Error {
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Error::Type(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Type(e) => write!(f, "type error: {e}"),
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Overflow(what) => write!(f, "overflow: {what} is out of range"),
            Error::DepthExceeded { limit } => {
                write!(f, "nesting exceeds the maximum depth of {limit}")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Self {
        Error::Type(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;

    #[test]
    fn test_display() {
        let err: Error = TypeError::NonStringKey { type_name: "int" }.into();
        assert_eq!(
            err.to_string(),
            "type error: JSON object keys must be strings, found int"
        );
        let err: Error = ParseError::new(ParseErrorKind::EmptyInput, 0).into();
        assert_eq!(err.to_string(), "parse error: empty input at offset 0");
        assert_eq!(
            Error::Overflow("inf".into()).to_string(),
            "overflow: inf is out of range"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let err: Error = ParseError::new(ParseErrorKind::Incomplete, 3).into();
        assert!(err.source().is_some());
        assert_eq!(
            err.parse_error().map(|e| e.kind),
            Some(ParseErrorKind::Incomplete)
        );
        assert!(Error::DepthExceeded { limit: 2 }.source().is_none());
    }
}
