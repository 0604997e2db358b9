// SPDX-License-Identifier: Apache-2.0

//! Walks a [`Value`] tree and writes it through the [`Generator`].

use std::collections::{hash_map, HashSet};

use log::debug;

use crate::classify::{classify, classify_key, Encodable, Sequence};
use crate::error::TypeError;
use crate::generator::Generator;
use crate::value::{Key, Value};
use crate::{EncodeConfig, Error};

/// Encode a value as JSON text.
///
/// On failure nothing is returned: a partly written document is discarded.
/// One-shot iterators inside `value` are drained by this call whether or not
/// it succeeds.
pub fn encode(value: &Value, config: &EncodeConfig) -> Result<Vec<u8>, Error> {
    let mut gen = Generator::new(config)?;
    walk(&mut gen, value)?;
    let out = gen.into_bytes();
    debug!("encoded {} as {} bytes", value.type_name(), out.len());
    Ok(out)
}

/// Encode without any whitespace
pub fn to_vec(value: &Value) -> Result<Vec<u8>, Error> {
    encode(value, &EncodeConfig::compact())
}

/// Encode with `indent` spaces per nesting level and a trailing newline
pub fn to_vec_pretty(value: &Value, indent: usize) -> Result<Vec<u8>, Error> {
    encode(value, &EncodeConfig::pretty(indent))
}

/// A borrowed container whose members are still being written
enum Frame<'a> {
    Items(std::slice::Iter<'a, Value>),
    Ordered(indexmap::map::Iter<'a, Key, Value>),
    Unordered(hash_map::Iter<'a, Key, Value>),
}

/// Depth-first walk over an explicit stack, so nesting depth is bounded by
/// memory rather than by the call stack.
fn walk(gen: &mut Generator, root: &Value) -> Result<(), Error> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut current = Some(root);
    while let Some(value) = current {
        if let Some(frame) = write_value(gen, value)? {
            stack.push(frame);
        }
        current = next_value(gen, &mut stack)?;
    }
    Ok(())
}

/// Write a scalar whole, or open a container and return its frame
fn write_value<'a>(gen: &mut Generator, value: &'a Value) -> Result<Option<Frame<'a>>, Error> {
    let frame = match classify(value) {
        Encodable::Null => {
            gen.null()?;
            None
        }
        Encodable::Bool(b) => {
            gen.bool(b)?;
            None
        }
        Encodable::Integer(i) => {
            gen.integer(i)?;
            None
        }
        Encodable::Float(f) => {
            gen.float(f)?;
            None
        }
        Encodable::String(bytes) => {
            gen.string(bytes)?;
            None
        }
        Encodable::OrderedMapping(map) => {
            check_distinct_keys(map.keys())?;
            gen.map_open()?;
            Some(Frame::Ordered(map.iter()))
        }
        Encodable::UnorderedMapping(map) => {
            check_distinct_keys(map.keys())?;
            gen.map_open()?;
            Some(Frame::Unordered(map.iter()))
        }
        Encodable::Sequence(Sequence::Items(items)) => {
            gen.array_open()?;
            Some(Frame::Items(items.iter()))
        }
        Encodable::Sequence(Sequence::OneShot(iter)) => {
            gen.array_open()?;
            // Items arrive owned, so each one gets a walk of its own.
            // An already drained iterator encodes as an empty array.
            if let Some(items) = iter.take() {
                for item in items {
                    walk(gen, &item)?;
                }
            }
            gen.array_close()?;
            None
        }
        Encodable::Unsupported(type_name) => {
            return Err(TypeError::UnsupportedValue {
                type_name: type_name.to_owned(),
            }
            .into());
        }
    };
    Ok(frame)
}

/// Close finished containers until one yields another member
fn next_value<'a>(
    gen: &mut Generator,
    stack: &mut Vec<Frame<'a>>,
) -> Result<Option<&'a Value>, Error> {
    while let Some(frame) = stack.last_mut() {
        let next = match frame {
            Frame::Items(items) => items.next(),
            Frame::Ordered(entries) => write_key(gen, entries.next())?,
            Frame::Unordered(entries) => write_key(gen, entries.next())?,
        };
        if next.is_some() {
            return Ok(next);
        }
        match stack.pop() {
            Some(Frame::Items(_)) => gen.array_close()?,
            Some(_) => gen.map_close()?,
            None => {}
        }
    }
    Ok(None)
}

fn write_key<'a>(
    gen: &mut Generator,
    entry: Option<(&Key, &'a Value)>,
) -> Result<Option<&'a Value>, Error> {
    let Some((key, value)) = entry else {
        return Ok(None);
    };
    let key = classify_key(key).map_err(|type_name| TypeError::NonStringKey { type_name })?;
    gen.key(key)?;
    Ok(Some(value))
}

/// `Key::Str` and `Key::Bytes` holding the same bytes would write one JSON
/// key twice.
fn check_distinct_keys<'a, I>(keys: I) -> Result<(), Error>
where
    I: Iterator<Item = &'a Key> + Clone,
{
    if !keys.clone().any(|key| matches!(key, Key::Bytes(_))) {
        return Ok(());
    }
    let mut seen = HashSet::new();
    for bytes in keys.filter_map(|key| classify_key(key).ok()) {
        if !seen.insert(bytes) {
            return Err(TypeError::DuplicateKey {
                key: String::from_utf8_lossy(bytes).into_owned(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;
    use std::collections::HashMap;

    fn compact(value: &Value) -> String {
        String::from_utf8(to_vec(value).unwrap()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(compact(&Value::Null), "null");
        assert_eq!(compact(&Value::Bool(true)), "true");
        assert_eq!(compact(&Value::from(-3)), "-3");
        assert_eq!(compact(&Value::Float(2.5)), "2.5");
        assert_eq!(compact(&Value::from("x\ny")), r#""x\ny""#);
    }

    #[test]
    fn test_ordered_mapping_keeps_order() {
        let mut map = Map::new();
        for (k, v) in [("z", 1), ("y", 2), ("x", 3), ("a", 42)] {
            map.insert(Key::from(k), Value::from(v));
        }
        map.insert(Key::from("z"), Value::from(50));
        assert_eq!(
            compact(&Value::Object(map)),
            r#"{"z":50,"y":2,"x":3,"a":42}"#
        );
    }

    #[test]
    fn test_unordered_mapping_has_each_key_once() {
        let dict: HashMap<Key, Value> = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (Key::from(k), Value::from(v)))
            .collect();
        let text = to_vec(&Value::Dict(dict.clone())).unwrap();
        let back = crate::decode(&text).unwrap();
        let back = back.as_object().unwrap();
        assert_eq!(back.len(), 3);
        for (key, value) in &dict {
            assert_eq!(back.get(key), Some(value));
        }
    }

    #[test]
    fn test_sequences() {
        let expected = "[1,2]";
        let items = vec![Value::from(1), Value::from(2)];
        assert_eq!(compact(&Value::Array(items.clone())), expected);
        assert_eq!(compact(&Value::Tuple(items.clone())), expected);
        assert_eq!(compact(&Value::from_iter_once(items.into_iter())), expected);
    }

    #[test]
    fn test_one_shot_drained_once() {
        let iter = Value::from_iter_once(vec![Value::Null].into_iter());
        assert_eq!(compact(&iter), "[null]");
        assert_eq!(compact(&iter), "[]");
    }

    #[test]
    fn test_unsupported_value_nested() {
        let value = Value::Array(vec![Value::from(1), Value::Set(vec![])]);
        match to_vec(&value) {
            Err(Error::Type(TypeError::UnsupportedValue { type_name })) => {
                assert_eq!(type_name, "set")
            }
            other => panic!("unexpected {other:?}"),
        }
        let value: Value = [("k", Value::Opaque("Widget".into()))].into_iter().collect();
        assert!(to_vec(&value).unwrap_err().is_type());
    }

    #[test]
    fn test_non_string_keys() {
        for key in [Key::from(1i64), Key::from(1.5), Key::Bool(true), Key::Null] {
            let mut map = Map::new();
            map.insert(key, Value::Null);
            assert!(matches!(
                to_vec(&Value::Object(map)),
                Err(Error::Type(TypeError::NonStringKey { .. }))
            ));
        }
    }

    #[test]
    fn test_bytes_and_utf8() {
        assert_eq!(
            to_vec(&Value::Bytes(b"f\xe9in".to_vec())).unwrap(),
            b"\"f\xe9in\""
        );
        assert_eq!(compact(&Value::from("grüße")), "\"grüße\"");
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            to_vec(&Value::Array(vec![Value::Float(f64::NEG_INFINITY)])),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn test_pretty_helpers() {
        let value: Value = [("foo", "bar")].into_iter().collect();
        assert_eq!(
            to_vec_pretty(&value, 4).unwrap(),
            b"{\n    \"foo\": \"bar\"\n}\n"
        );
    }

    #[test]
    fn test_str_and_bytes_key_collision() {
        let mut map = Map::new();
        map.insert(Key::from("a"), Value::from(1));
        map.insert(Key::Bytes(b"a".to_vec()), Value::from(2));
        assert!(matches!(
            to_vec(&Value::Object(map.clone())),
            Err(Error::Type(TypeError::DuplicateKey { ref key })) if key == "a"
        ));
        let dict: HashMap<Key, Value> = map.into_iter().collect();
        assert!(matches!(
            to_vec(&Value::Dict(dict)),
            Err(Error::Type(TypeError::DuplicateKey { .. }))
        ));

        let mut distinct = Map::new();
        distinct.insert(Key::from("a"), Value::from(1));
        distinct.insert(Key::Bytes(b"b".to_vec()), Value::from(2));
        assert_eq!(compact(&Value::Object(distinct)), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_deep_nesting_encodes_without_recursion() {
        let depth = 100_000;
        let mut value = Value::Null;
        for level in 0..depth {
            value = if level % 2 == 0 {
                Value::Array(vec![value])
            } else {
                [("k", value)].into_iter().collect()
            };
        }
        let text = to_vec(&value).unwrap();
        assert_eq!(text.len(), 4 + depth / 2 * 2 + depth / 2 * 6);
        assert!(text.starts_with(br#"{"k":[{"k":["#));
        assert!(text.ends_with(b"null]}]}"));
    }

    #[test]
    fn test_huge_indent_is_overflow() {
        let value = Value::Array(vec![Value::from(1)]);
        assert!(matches!(
            to_vec_pretty(&value, usize::MAX),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn test_depth_guard_on_self_feeding_iterator() {
        // Each level yields another iterator, as a cyclic structure would
        fn nest(level: usize) -> Value {
            Value::from_iter_once(std::iter::once_with(move || nest(level + 1)))
        }
        let config = EncodeConfig::default().with_max_depth(16);
        assert!(matches!(
            encode(&nest(0), &config),
            Err(Error::DepthExceeded { limit: 16 })
        ));
    }
}
