// SPDX-License-Identifier: Apache-2.0

//! The dynamic value model shared by the decoder and the encoder.
//!
//! Decoding only ever produces [`Value::Null`], [`Value::Bool`],
//! [`Value::Integer`], [`Value::Float`], [`Value::String`], [`Value::Array`]
//! and [`Value::Object`]. The remaining variants exist so callers can hand
//! the encoder everything a dynamic host language might hold, including
//! kinds that JSON cannot represent.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use num_bigint::BigInt;

/// An insertion-ordered mapping, the shape decoded objects take
pub type Map = IndexMap<Key, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// An integer of any magnitude
    Integer(BigInt),
    Float(f64),
    String(String),
    /// A byte string, encoded as-is between quotes
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// An immutable sequence, encoded like an array
    Tuple(Vec<Value>),
    /// A lazy sequence that can be drained once
    Iter(OneShot),
    /// An ordered mapping
    Object(Map),
    /// A mapping with no defined iteration order
    Dict(HashMap<Key, Value>),
    /// A set, which has no JSON form
    Set(Vec<Value>),
    /// A value of some host type with no JSON form, named by its type
    Opaque(String),
}

impl Value {
    /// Name of the value's kind, as used in type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Iter(_) => "generator",
            Value::Object(_) => "dict",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::Opaque(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a string key in either mapping kind
    pub fn get(&self, key: &str) -> Option<&Value> {
        let key = Key::Str(key.to_owned());
        match self {
            Value::Object(map) => map.get(&key),
            Value::Dict(map) => map.get(&key),
            _ => None,
        }
    }

    /// Wrap an iterator as a sequence that the encoder drains exactly once
    pub fn from_iter_once<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + Send + 'static,
    {
        Value::Iter(OneShot::new(iter))
    }
}

impl Value {
    /// True for a container that still holds values
    fn has_children(&self) -> bool {
        match self {
            Value::Array(items) | Value::Tuple(items) | Value::Set(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Dict(map) => !map.is_empty(),
            _ => false,
        }
    }

    /// Move nested containers out into `pending`. Leaves drop in place.
    fn drain_children(&mut self, pending: &mut Vec<Value>) {
        match self {
            Value::Array(items) | Value::Tuple(items) | Value::Set(items) => {
                pending.extend(items.drain(..).filter(Value::has_children));
            }
            Value::Object(map) => {
                pending.extend(map.drain(..).map(|(_, v)| v).filter(Value::has_children));
            }
            Value::Dict(map) => {
                pending.extend(map.drain().map(|(_, v)| v).filter(Value::has_children));
            }
            _ => {}
        }
    }
}

// Dropping a deeply nested tree field by field would recurse once per level,
// so nested containers are flattened onto a heap stack first.
impl Drop for Value {
    fn drop(&mut self) {
        if !self.has_children() {
            return;
        }
        let mut pending = Vec::new();
        self.drain_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.drain_children(&mut pending);
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A mapping key.
///
/// Only [`Key::Str`] and [`Key::Bytes`] are valid JSON object keys; the
/// other kinds exist so that hashable host values can be rejected with a
/// type error rather than silently converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Bytes(Vec<u8>),
    Integer(BigInt),
    Float(F64Bits),
    Bool(bool),
    Null,
}

impl Key {
    pub fn type_name(&self) -> &'static str {
        match self {
            Key::Str(_) => "str",
            Key::Bytes(_) => "bytes",
            Key::Integer(_) => "int",
            Key::Float(_) => "float",
            Key::Bool(_) => "bool",
            Key::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Integer(BigInt::from(i))
    }
}

impl From<f64> for Key {
    fn from(f: f64) -> Self {
        Key::Float(F64Bits(f))
    }
}

/// An `f64` usable as a hash key, compared by bit pattern.
///
/// `0.0` and `-0.0` are treated as the same key.
#[derive(Debug, Clone, Copy)]
pub struct F64Bits(pub f64);

impl F64Bits {
    fn bits(self) -> u64 {
        if self.0 == 0.0 {
            0.0f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for F64Bits {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for F64Bits {}

impl Hash for F64Bits {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

type BoxedIter = Box<dyn Iterator<Item = Value> + Send>;

/// A lazily produced sequence, shared between clones and consumed on first use.
///
/// Once drained, every handle yields nothing.
#[derive(Clone)]
pub struct OneShot(Arc<Mutex<Option<BoxedIter>>>);

impl OneShot {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + Send + 'static,
    {
        OneShot(Arc::new(Mutex::new(Some(Box::new(iter)))))
    }

    /// Take the iterator out, leaving the sequence exhausted
    pub fn take(&self) -> Option<BoxedIter> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_exhausted(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl PartialEq for OneShot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl core::fmt::Debug for OneShot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = if self.is_exhausted() { "exhausted" } else { "pending" };
        write!(f, "OneShot({state})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_from_pairs_keeps_order() {
        let value: Value = [("z", Value::from(1)), ("a", Value::from(2))]
            .into_iter()
            .collect();
        let keys: Vec<_> = value
            .as_object()
            .unwrap()
            .keys()
            .filter_map(Key::as_str)
            .collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(value.get("a"), Some(&Value::from(2)));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_float_keys_hash_by_bits() {
        let mut map = HashMap::new();
        map.insert(Key::from(0.0), 1);
        assert_eq!(map.get(&Key::from(-0.0)), Some(&1));
        assert_eq!(map.get(&Key::from(0.5)), None);
        assert_eq!(Key::from(f64::NAN), Key::from(f64::NAN));
    }

    #[test]
    fn test_one_shot_drains_once() {
        let iter = OneShot::new(vec![Value::Null, Value::from(true)].into_iter());
        let clone = iter.clone();
        assert_eq!(iter, clone);
        assert_eq!(format!("{iter:?}"), "OneShot(pending)");
        let items: Vec<_> = clone.take().unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(iter.take().is_none());
        assert!(iter.is_exhausted());
        assert_eq!(format!("{iter:?}"), "OneShot(exhausted)");
    }

    #[test]
    fn test_deep_tree_drops_without_recursion() {
        let mut value = Value::Null;
        for depth in 0..200_000 {
            value = match depth % 3 {
                0 => Value::Array(vec![value]),
                1 => [("k", value)].into_iter().collect(),
                _ => Value::Tuple(vec![Value::from(depth as i64), value]),
            };
        }
        drop(value);
    }

    #[test]
    fn test_drop_keeps_siblings_intact() {
        let shared = Value::Array(vec![Value::from("leaf"), Value::Array(vec![Value::Null])]);
        let outer = Value::Array(vec![shared.clone(), shared.clone()]);
        drop(outer);
        assert_eq!(shared.as_array().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Set(vec![]).type_name(), "set");
        assert_eq!(Value::Opaque("Widget".into()).type_name(), "object");
        assert_eq!(Value::from_iter_once(std::iter::empty()).type_name(), "generator");
        assert_eq!(Key::from(3i64).type_name(), "int");
    }
}
