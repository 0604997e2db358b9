// SPDX-License-Identifier: Apache-2.0

//! A streaming JSON codec between a dynamic value model and JSON text.
//!
//! Decoding feeds bytes through a resumable tokenizer and push parser into a
//! tree builder, so input may arrive in chunks of any size:
//!
//! ```
//! use picojson_codec::{decode, to_vec, Value};
//!
//! let value = decode(br#"{"n": 123456789012345678901234567890, "ok": true}"#).unwrap();
//! assert_eq!(value.get("ok"), Some(&Value::Bool(true)));
//! assert_eq!(to_vec(&value).unwrap(), br#"{"n":123456789012345678901234567890,"ok":true}"#);
//! ```
//!
//! Encoding classifies each [`Value`] and writes it through a generator that
//! supports compact and indented output. Kinds with no JSON form, such as
//! sets and opaque host objects, are rejected with [`Error::Type`].

mod tokenizer;

mod escape_processor;

mod parse_error;
pub use parse_error::{ParseError, ParseErrorKind};

mod shared;
pub use shared::ParseEvent;

mod json_number;
pub use json_number::{JsonNumber, NumberValue};

mod push_parser;
pub use push_parser::{PushParseError, PushParser, PushParserHandler};

mod value;
pub use value::{F64Bits, Key, Map, OneShot, Value};

mod config;
pub use config::{DecodeConfig, EncodeConfig, DEFAULT_READ_CHUNK_SIZE, MAX_INDENT};

mod error;
pub use error::{Error, TypeError};

mod decoder;
pub use decoder::{decode, decode_with_config, Decoder};

mod classify;
pub use classify::{classify, classify_key, Encodable, Sequence};

mod generator;

mod encoder;
pub use encoder::{encode, to_vec, to_vec_pretty};

mod binding;
pub use binding::{dump, dumps, load, load_with_config, loads};

mod chunk_reader;
pub use chunk_reader::ChunkReader;
