// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use num_bigint::BigInt;

use crate::value::{Key, Map, OneShot, Value};

/// The sequence shapes the encoder knows how to walk
#[derive(Debug, Clone, Copy)]
pub enum Sequence<'a> {
    Items(&'a [Value]),
    OneShot(&'a OneShot),
}

/// How a value is written as JSON
#[derive(Debug, Clone, Copy)]
pub enum Encodable<'a> {
    Null,
    Bool(bool),
    Integer(&'a BigInt),
    Float(f64),
    /// String content as raw bytes, written without UTF-8 validation
    String(&'a [u8]),
    OrderedMapping(&'a Map),
    UnorderedMapping(&'a HashMap<Key, Value>),
    Sequence(Sequence<'a>),
    /// No JSON form; carries the type name for the error message
    Unsupported(&'a str),
}

/// Decide how to encode a value. Never fails.
pub fn classify(value: &Value) -> Encodable<'_> {
    match value {
        Value::Null => Encodable::Null,
        Value::Bool(b) => Encodable::Bool(*b),
        Value::Integer(i) => Encodable::Integer(i),
        Value::Float(f) => Encodable::Float(*f),
        Value::String(s) => Encodable::String(s.as_bytes()),
        Value::Bytes(b) => Encodable::String(b),
        Value::Object(map) => Encodable::OrderedMapping(map),
        Value::Dict(map) => Encodable::UnorderedMapping(map),
        Value::Array(items) | Value::Tuple(items) => Encodable::Sequence(Sequence::Items(items)),
        Value::Iter(iter) => Encodable::Sequence(Sequence::OneShot(iter)),
        Value::Set(_) => Encodable::Unsupported(value.type_name()),
        Value::Opaque(type_name) => Encodable::Unsupported(type_name),
    }
}

/// The key's bytes, or the type name of a key JSON cannot hold.
///
/// Keys are never coerced: `1` and `"1"` are different keys.
pub fn classify_key(key: &Key) -> Result<&[u8], &'static str> {
    match key {
        Key::Str(s) => Ok(s.as_bytes()),
        Key::Bytes(b) => Ok(b.as_slice()),
        other => Err(other.type_name()),
    }
}
