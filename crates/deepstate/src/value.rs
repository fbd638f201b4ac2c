//! State tree values.
//!
//! A [`Value`] is either a [`Record`] (string-keyed mapping) or a non-record
//! leaf. Records are persistent: cloning one bumps a reference count, and
//! writing through a clone copies only the node being written. This is what
//! lets an update copy just the spine from the root to the updated leaf while
//! sharing every sibling subtree with the previous root.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::sync::Arc;

static UNDEFINED: Value = Value::Undefined;

/// A node in a state tree.
///
/// `Undefined` is distinct from `Null`: a record entry holding `Undefined` is
/// present (it shows up in [`Record::keys`]) but has no value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Explicit absence of a value.
    #[default]
    Undefined,
    /// JSON null.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Numeric leaf.
    Number(serde_json::Number),
    /// String leaf.
    String(String),
    /// Sequence. Never merged element-wise.
    Array(Vec<Value>),
    /// String-keyed mapping.
    Record(Record),
}

impl Value {
    /// Create an empty record value.
    #[inline]
    pub fn empty_record() -> Self {
        Value::Record(Record::new())
    }

    /// Returns true if this value is a record.
    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Returns true if this value is `Undefined`.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the record if this value is one.
    #[inline]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Get a mutable record if this value is one.
    #[inline]
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Look up a key if this value is a record.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|r| r.get(key))
    }

    /// Convert to a JSON value.
    ///
    /// Record entries holding `Undefined` are dropped, `Undefined` array
    /// elements become `null`, and a top-level `Undefined` becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Record(r) => serde_json::Value::Object(
                r.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// A persistent string-keyed mapping.
///
/// Entries keep insertion order for display and serialization, but equality
/// ignores order.
#[derive(Clone, Default, PartialEq)]
pub struct Record(Arc<IndexMap<String, Value>>);

impl Record {
    /// Create an empty record.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get a mutable reference to an entry, detaching this record from any
    /// clones first.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        Arc::make_mut(&mut self.0).get_mut(key)
    }

    /// Insert an entry, returning the previous value for the key.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into())
    }

    /// Remove an entry, preserving the order of the remaining ones.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if !self.0.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut self.0).shift_remove(key)
    }

    /// Get the record stored under `key`, replacing whatever is there with an
    /// empty record if it is missing or not a record.
    pub fn child_record_mut(&mut self, key: &str) -> &mut Record {
        let map = Arc::make_mut(&mut self.0);
        let slot = map.entry(key.to_owned()).or_insert(Value::Undefined);
        if !slot.is_record() {
            *slot = Value::empty_record();
        }
        match slot {
            Value::Record(r) => r,
            _ => unreachable!("slot was just replaced with a record"),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns true if both records share the same storage.
    ///
    /// Two records that share storage are guaranteed equal; unequal storage
    /// says nothing about equality.
    #[inline]
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(Arc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<&str> for Value {
    type Output = Value;

    /// Missing keys and non-record values index to `Undefined`.
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&UNDEFINED)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(map.into_iter().collect()),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        v.to_json()
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats become `Null`, as in `serde_json`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<u64> for Value {
    fn eq(&self, other: &u64) -> bool {
        matches!(self, Value::Number(n) if n.as_u64() == Some(*other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<serde_json::Value> for Value {
    /// Compares through [`Value::to_json`], so `Undefined` entries are ignored.
    fn eq(&self, other: &serde_json::Value) -> bool {
        &self.to_json() == other
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(r) => r.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.values().filter(|v| !v.is_undefined()).count();
        let mut map = serializer.serialize_map(Some(len))?;
        for (k, v) in self.iter().filter(|(_, v)| !v.is_undefined()) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Record(r) => Ok(r),
            other => Err(D::Error::custom(format!(
                "expected record, found {}",
                crate::value_type_name(&other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let v = Value::from(json!({"a": {"b": [1, "x", null]}}));
        assert!(v.is_record());
        assert!(v["a"].is_record());
        assert_eq!(
            v["a"]["b"],
            Value::Array(vec![Value::from(1), Value::from("x"), Value::Null])
        );
    }

    #[test]
    fn test_index_missing_is_undefined() {
        let v = Value::from(json!({"a": 1}));
        assert!(v["missing"].is_undefined());
        assert!(v["a"]["deeper"].is_undefined());
    }

    #[test]
    fn test_to_json_drops_undefined_entries() {
        let mut r = Record::new();
        r.insert("kept", 1);
        r.insert("gone", Value::Undefined);
        let v = Value::Record(r);

        assert_eq!(v.to_json(), json!({"kept": 1}));
        assert_eq!(Value::Undefined.to_json(), json!(null));
        assert_eq!(
            Value::Array(vec![Value::Undefined, Value::from(2)]).to_json(),
            json!([null, 2])
        );
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let mut r = Record::new();
        r.insert("name", "Bob");
        r.insert("contact", Value::Undefined);
        let v = Value::Record(r);

        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, r#"{"name":"Bob"}"#);
    }

    #[test]
    fn test_deserialize_value_and_record() {
        let v: Value = serde_json::from_str(r#"{"a":{"b":true}}"#).unwrap();
        assert_eq!(v["a"]["b"], true);

        let r: Record = serde_json::from_str(r#"{"x":1}"#).unwrap();
        assert_eq!(r.get("x"), Some(&Value::from(1)));

        let err = serde_json::from_str::<Record>("[1]").unwrap_err();
        assert!(err.to_string().contains("expected record"));
    }

    #[test]
    fn test_record_equality_ignores_order() {
        let a: Record = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Record = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_clone_is_copy_on_write() {
        let original: Record = [("x", 1)].into_iter().collect();
        let mut copy = original.clone();
        assert!(copy.ptr_eq(&original));

        copy.insert("x", 2);
        assert!(!copy.ptr_eq(&original));
        assert_eq!(original.get("x"), Some(&Value::from(1)));
        assert_eq!(copy.get("x"), Some(&Value::from(2)));
    }

    #[test]
    fn test_child_record_mut_replaces_non_record() {
        let mut r: Record = [("a", Value::from(5))].into_iter().collect();
        r.child_record_mut("a").insert("b", true);
        r.child_record_mut("fresh");

        assert_eq!(Value::Record(r).to_json(), json!({"a": {"b": true}, "fresh": {}}));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut r: Record = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(r.remove("b"), Some(Value::from(2)));
        assert_eq!(r.remove("missing"), None);
        let keys: Vec<_> = r.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert!(Value::from(f64::NAN).is_null());
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
    }
}
