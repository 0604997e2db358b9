// SPDX-License-Identifier: Apache-2.0

//! Builds [`Value`] trees from parser events.

use log::{debug, trace};

use crate::parse_error::{ParseError, ParseErrorKind};
use crate::push_parser::{PushParseError, PushParser, PushParserHandler};
use crate::value::{Key, Map, Value};
use crate::{DecodeConfig, Error, ParseEvent};

/// A container still being filled
#[derive(Debug)]
enum BuildFrame {
    Mapping {
        entries: Map,
        /// Key read but not yet paired with its value
        pending_key: Option<String>,
    },
    Sequence {
        items: Vec<Value>,
    },
}

impl BuildFrame {
    fn into_value(self) -> Value {
        match self {
            BuildFrame::Mapping { entries, .. } => Value::Object(entries),
            BuildFrame::Sequence { items } => Value::Array(items),
        }
    }
}

/// Event handler assembling one document
#[derive(Debug, Default)]
struct Builder {
    stack: Vec<BuildFrame>,
    result: Option<Value>,
    max_depth: Option<usize>,
}

fn unexpected() -> Error {
    Error::Parse(ParseError::new(ParseErrorKind::UnexpectedState, 0))
}

impl Builder {
    fn open(&mut self, frame: BuildFrame) -> Result<(), Error> {
        if let Some(limit) = self.max_depth {
            if self.stack.len() >= limit {
                return Err(Error::DepthExceeded { limit });
            }
        }
        self.stack.push(frame);
        trace!("open container, depth {}", self.stack.len());
        Ok(())
    }

    fn close(&mut self, mapping: bool) -> Result<(), Error> {
        let frame = self.stack.pop().ok_or_else(unexpected)?;
        if matches!(frame, BuildFrame::Mapping { .. }) != mapping {
            return Err(unexpected());
        }
        trace!("close container, depth {}", self.stack.len());
        self.complete(frame.into_value())
    }

    /// Attach a finished value to the innermost container, or make it the result
    fn complete(&mut self, value: Value) -> Result<(), Error> {
        match self.stack.last_mut() {
            None => {
                debug!("decoded top-level {}", value.type_name());
                self.result = Some(value);
            }
            Some(BuildFrame::Sequence { items }) => items.push(value),
            Some(BuildFrame::Mapping {
                entries,
                pending_key,
            }) => {
                let key = pending_key.take().ok_or_else(unexpected)?;
                // A repeated key keeps its first position and takes the new value
                entries.insert(Key::Str(key), value);
            }
        }
        Ok(())
    }
}

impl PushParserHandler<Error> for Builder {
    fn handle_event(&mut self, event: ParseEvent<'_>) -> Result<(), Error> {
        match event {
            ParseEvent::MapStart => self.open(BuildFrame::Mapping {
                entries: Map::new(),
                pending_key: None,
            }),
            ParseEvent::ArrayStart => self.open(BuildFrame::Sequence { items: Vec::new() }),
            ParseEvent::MapKey(key) => match self.stack.last_mut() {
                Some(BuildFrame::Mapping { pending_key, .. }) => {
                    *pending_key = Some(key.to_owned());
                    Ok(())
                }
                _ => Err(unexpected()),
            },
            ParseEvent::MapEnd => self.close(true),
            ParseEvent::ArrayEnd => self.close(false),
            ParseEvent::String(s) => self.complete(Value::String(s.to_owned())),
            ParseEvent::Number(n) => self.complete(n.into_value()),
            ParseEvent::Bool(b) => self.complete(Value::Bool(b)),
            ParseEvent::Null => self.complete(Value::Null),
            ParseEvent::EndDocument => Ok(()),
        }
    }
}

impl From<PushParseError<Error>> for Error {
    fn from(e: PushParseError<Error>) -> Self {
        match e {
            PushParseError::Parse(e) => Error::Parse(e),
            PushParseError::Handler(e) => e,
        }
    }
}

/// Incremental decoder for a single JSON document.
///
/// Feed chunks of any size, then call [`Decoder::finish`]. After a `feed`
/// error the decoder is in an unspecified state and should be dropped.
///
/// ```
/// use picojson_codec::{Decoder, Value};
///
/// let mut decoder = Decoder::new();
/// decoder.feed(b"[1, 2").unwrap();
/// decoder.feed(b", 3]").unwrap();
/// assert!(decoder.is_complete());
/// let value = decoder.finish().unwrap();
/// assert_eq!(value, Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]));
/// ```
pub struct Decoder {
    parser: PushParser<Builder>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(&DecodeConfig::default())
    }

    pub fn with_config(config: &DecodeConfig) -> Self {
        let builder = Builder {
            max_depth: config.max_depth,
            ..Builder::default()
        };
        Self {
            parser: PushParser::new(builder),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.parser.write::<Error>(chunk).map_err(Error::from)
    }

    /// True once a complete top-level value has been read.
    ///
    /// A top-level number is only known to be complete at [`Decoder::finish`].
    pub fn is_complete(&self) -> bool {
        self.parser.is_finished()
    }

    /// Bytes fed so far
    pub fn bytes_consumed(&self) -> usize {
        self.parser.position()
    }

    /// Signal end of input and return the document
    pub fn finish(mut self) -> Result<Value, Error> {
        self.parser.finish::<Error>().map_err(Error::from)?;
        let consumed = self.parser.position();
        let value = self
            .parser
            .into_handler()
            .result
            .ok_or_else(|| Error::Parse(ParseError::new(ParseErrorKind::Incomplete, consumed)))?;
        debug!("decode finished after {} bytes", consumed);
        Ok(value)
    }
}

/// Decode one complete JSON document
pub fn decode(input: &[u8]) -> Result<Value, Error> {
    decode_with_config(input, &DecodeConfig::default())
}

pub fn decode_with_config(input: &[u8], config: &DecodeConfig) -> Result<Value, Error> {
    let mut decoder = Decoder::with_config(config);
    decoder.feed(input)?;
    decoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use test_log::test;

    fn object(pairs: &[(&str, Value)]) -> Value {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode(b"null").unwrap(), Value::Null);
        assert_eq!(decode(b" true ").unwrap(), Value::Bool(true));
        assert_eq!(decode(b"-7").unwrap(), Value::from(-7));
        assert_eq!(decode(b"0.25").unwrap(), Value::Float(0.25));
        assert_eq!(decode(b"\"hi\"").unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_nested_structure() {
        let value = decode(br#"{"a": {"b": [1, {"c": null}]}, "d": []}"#).unwrap();
        let expected = object(&[
            (
                "a",
                object(&[(
                    "b",
                    Value::Array(vec![Value::from(1), object(&[("c", Value::Null)])]),
                )]),
            ),
            ("d", Value::Array(vec![])),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_object_order_follows_input() {
        let value = decode(br#"{"z": 1, "y": 2, "x": 3}"#).unwrap();
        let keys: Vec<_> = value
            .as_object()
            .unwrap()
            .keys()
            .filter_map(Key::as_str)
            .collect();
        assert_eq!(keys, ["z", "y", "x"]);
    }

    #[test]
    fn test_duplicate_key_last_value_first_position() {
        let value = decode(br#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(value, object(&[("a", Value::from(3)), ("b", Value::from(2))]));
    }

    #[test]
    fn test_big_integers_exact() {
        let value = decode(b"[11889582081, 123456789012345678901234567890]").unwrap();
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::from(11889582081i64), Value::Integer(big)])
        );
    }

    #[test]
    fn test_streaming_matches_whole() {
        let input: &[u8] = br#"{"foo": ["one", "two", ["three", "four"]]}"#;
        let whole = decode(input).unwrap();
        for size in 1..input.len() {
            let mut decoder = Decoder::new();
            for chunk in input.chunks(size) {
                decoder.feed(chunk).unwrap();
            }
            assert!(decoder.is_complete());
            assert_eq!(decoder.finish().unwrap(), whole, "chunk size {size}");
        }
    }

    #[test]
    fn test_incomplete_is_not_complete() {
        let mut decoder = Decoder::new();
        decoder.feed(b"{\"a\": [").unwrap();
        assert!(!decoder.is_complete());
        assert_eq!(decoder.bytes_consumed(), 7);
        let err = decoder.finish().unwrap_err();
        assert_eq!(
            err.parse_error().map(|e| e.kind),
            Some(ParseErrorKind::Incomplete)
        );
    }

    #[test]
    fn test_trailing_content() {
        let mut decoder = Decoder::new();
        decoder.feed(b"{} ").unwrap();
        assert!(decoder.is_complete());
        let err = decoder.feed(b" x").unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::at_byte(ParseErrorKind::TrailingContent, 4, b'x'))
        );
    }

    #[test]
    fn test_empty_input() {
        let err = decode(b"").unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::new(ParseErrorKind::EmptyInput, 0))
        );
    }

    #[test]
    fn test_deep_nesting_decodes_and_drops() {
        let depth = 100_000;
        let mut input = vec![b'['; depth];
        input.resize(depth * 2, b']');
        let value = decode(&input).unwrap();
        let mut level = &value;
        for _ in 1..depth {
            level = &level.as_array().unwrap()[0];
        }
        assert_eq!(level.as_array().map(<[Value]>::len), Some(0));
        drop(value);
    }

    #[test]
    fn test_max_depth() {
        let config = DecodeConfig::default().with_max_depth(2);
        assert!(decode_with_config(b"[[1]]", &config).is_ok());
        assert!(matches!(
            decode_with_config(b"[[[1]]]", &config),
            Err(Error::DepthExceeded { limit: 2 })
        ));
        assert!(matches!(
            decode_with_config(br#"{"a": {"b": {}}}"#, &config),
            Err(Error::DepthExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_builder_rejects_orphan_value() {
        let mut builder = Builder::default();
        builder.handle_event(ParseEvent::MapStart).unwrap();
        assert!(builder.handle_event(ParseEvent::Null).is_err());
    }
}
