// SPDX-License-Identifier: Apache-2.0

//! Entry points taking arguments as dynamic [`Value`]s, for embedding the
//! codec behind a scripting-language style interface.

use std::io::{ErrorKind, Read, Write};

use log::debug;
use num_traits::ToPrimitive;

use crate::error::TypeError;
use crate::{decode, encode, DecodeConfig, Decoder, EncodeConfig, Error, Value};

/// Decode JSON text held in a string or byte string value
pub fn loads(input: &Value) -> Result<Value, Error> {
    match input {
        Value::String(s) => decode(s.as_bytes()),
        Value::Bytes(b) => decode(b),
        other => Err(TypeError::ExpectedBytesOrString {
            found: other.type_name(),
        }
        .into()),
    }
}

/// Encode a value, pretty printed when `indent` is an integer.
///
/// An absent or null indent means compact output; a negative integer does
/// too.
pub fn dumps(value: &Value, indent: Option<&Value>) -> Result<Vec<u8>, Error> {
    encode(value, &indent_config(indent)?)
}

fn indent_config(indent: Option<&Value>) -> Result<EncodeConfig, Error> {
    match indent {
        None | Some(Value::Null) => Ok(EncodeConfig::compact()),
        Some(Value::Integer(width)) => {
            let width = width
                .to_i64()
                .ok_or_else(|| Error::Overflow(format!("indent {width}")))?;
            Ok(EncodeConfig::default().with_indent(width))
        }
        Some(other) => Err(TypeError::InvalidIndent {
            found: other.type_name(),
        }
        .into()),
    }
}

/// Decode one JSON document from a reader
pub fn load<R: Read>(reader: R) -> Result<Value, Error> {
    load_with_config(reader, &DecodeConfig::default())
}

/// Decode one JSON document, reading `read_chunk_size` bytes at a time.
///
/// Reading stops once the document is complete, so bytes after it are left
/// in the reader unless they arrived in the same chunk, in which case they
/// must be whitespace.
pub fn load_with_config<R: Read>(mut reader: R, config: &DecodeConfig) -> Result<Value, Error> {
    let mut decoder = Decoder::with_config(config);
    let mut buf = vec![0u8; config.read_chunk_size.max(1)];
    let mut reads = 0usize;
    while !decoder.is_complete() {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        reads += 1;
        decoder.feed(&buf[..n])?;
    }
    debug!(
        "load read {} bytes in {} chunks",
        decoder.bytes_consumed(),
        reads
    );
    decoder.finish()
}

/// Encode a value and write the whole document to `writer`
pub fn dump<W: Write>(value: &Value, mut writer: W, indent: Option<&Value>) -> Result<(), Error> {
    let text = dumps(value, indent)?;
    writer.write_all(&text)?;
    Ok(())
}
