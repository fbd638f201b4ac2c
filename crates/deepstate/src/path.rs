//! Dot-path representation for addressing locations in a state tree.
//!
//! A path is a sequence of record keys. The empty path addresses the root.
//! There are no index segments: arrays are leaves.

use crate::config::EmptySegmentPolicy;
use crate::error::{json_type_name, DeepStateError, DeepStateResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed dot-path.
///
/// # Examples
///
/// ```
/// use deepstate::Path;
///
/// let path: Path = "user.profile.name".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "user.profile.name");
///
/// assert!("user..name".parse::<Path>().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<String>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty path (alias for `new`).
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Parse a dot-path, rejecting empty segments.
    ///
    /// The empty string is the root path.
    pub fn parse(path: &str) -> DeepStateResult<Self> {
        Self::parse_with(path, EmptySegmentPolicy::Reject)
    }

    /// Parse a dot-path with an explicit policy for empty segments
    /// (leading, trailing or doubled dots).
    pub fn parse_with(path: &str, policy: EmptySegmentPolicy) -> DeepStateResult<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                match policy {
                    EmptySegmentPolicy::Reject => {
                        return Err(DeepStateError::invalid_path(path, "empty segment"));
                    }
                    EmptySegmentPolicy::Skip => continue,
                }
            }
            segments.push(segment.to_owned());
        }
        Ok(Self(segments))
    }

    /// Build a path from individual keys.
    ///
    /// Each key must be non-empty and must not contain a dot. Every `Path`
    /// is therefore written and read back as the same dot-path.
    pub fn from_keys<I, K>(keys: I) -> DeepStateResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .enumerate()
            .map(|(index, key)| validate_key(index, key.as_ref()).map(str::to_owned))
            .collect::<DeepStateResult<Vec<_>>>()
            .map(Self)
    }

    /// Push a key segment onto the path (mutating).
    ///
    /// The key must satisfy the same rules as [`Path::from_keys`]; on error
    /// the path is left unchanged.
    pub fn push_key(&mut self, k: impl Into<String>) -> DeepStateResult<()> {
        let key = k.into();
        validate_key(self.0.len(), &key)?;
        self.0.push(key);
        Ok(())
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Split into the final key and the segments leading to it.
    #[inline]
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn validate_key(index: usize, key: &str) -> DeepStateResult<&str> {
    if key.is_empty() {
        return Err(DeepStateError::invalid_key(index, "empty key"));
    }
    if key.contains('.') {
        return Err(DeepStateError::invalid_key(
            index,
            format!("key '{key}' contains '.'"),
        ));
    }
    Ok(key)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            f.write_str(first)?;
            for seg in iter {
                write!(f, ".{seg}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = DeepStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl TryFrom<&serde_json::Value> for Path {
    type Error = DeepStateError;

    /// Accepts `null` (root), a dot-path string, or an array of string keys.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Path::root()),
            serde_json::Value::String(s) => Path::parse(s),
            serde_json::Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    serde_json::Value::String(key) => {
                        validate_key(index, key).map(str::to_owned)
                    }
                    other => Err(DeepStateError::invalid_key(index, json_type_name(other))),
                })
                .collect::<DeepStateResult<Vec<_>>>()
                .map(Path),
            other => Err(DeepStateError::invalid_path(
                other.to_string(),
                "expected a dot-path string or an array of keys",
            )),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Path::try_from(&raw).map_err(serde::de::Error::custom)
    }
}

/// Construct a `Path` from a sequence of keys.
///
/// Expands to [`Path::from_keys`], so a key that is empty or contains a dot
/// yields `InvalidKey`.
///
/// # Examples
///
/// ```
/// use deepstate::path;
///
/// let p = path!("users", "alice", "email").unwrap();
/// assert_eq!(p.to_string(), "users.alice.email");
/// assert!(path!().unwrap().is_empty());
/// assert!(path!("a.b").is_err());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::DeepStateResult::<$crate::Path>::Ok($crate::Path::root())
    };
    ($($seg:expr),+ $(,)?) => {
        $crate::Path::from_keys([$(::core::convert::AsRef::<str>::as_ref(&$seg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_is_root() {
        let path = Path::parse("").unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_parse_nested() {
        let path = Path::parse("details.contact.email").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(&path[0], "details");
        assert_eq!(&path[2], "email");
        assert_eq!(path.to_string(), "details.contact.email");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for bad in [".foo", "foo.", "foo..bar", "."] {
            let err = Path::parse(bad).unwrap_err();
            assert!(
                matches!(err, DeepStateError::InvalidPath { .. }),
                "expected InvalidPath for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_skip_policy() {
        let path = Path::parse_with(".foo..bar.", EmptySegmentPolicy::Skip).unwrap();
        assert_eq!(path, path!("foo", "bar").unwrap());

        let path = Path::parse_with(".", EmptySegmentPolicy::Skip).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_parse_keeps_whitespace_keys() {
        let path = Path::parse("a. b").unwrap();
        assert_eq!(&path[1], " b");
    }

    #[test]
    fn test_from_keys_validates() {
        assert_eq!(Path::from_keys(["a", "b"]).unwrap(), path!("a", "b").unwrap());

        let err = Path::from_keys(["a", ""]).unwrap_err();
        assert!(matches!(err, DeepStateError::InvalidKey { index: 1, .. }));

        let err = Path::from_keys(["x.y"]).unwrap_err();
        assert!(matches!(err, DeepStateError::InvalidKey { index: 0, .. }));
    }

    #[test]
    fn test_try_from_json() {
        assert!(Path::try_from(&json!(null)).unwrap().is_empty());
        assert_eq!(Path::try_from(&json!("a.b")).unwrap(), path!("a", "b").unwrap());
        assert_eq!(
            Path::try_from(&json!(["a", "b"])).unwrap(),
            path!("a", "b").unwrap()
        );

        let err = Path::try_from(&json!(["a", 0])).unwrap_err();
        match err {
            DeepStateError::InvalidKey { index, found } => {
                assert_eq!(index, 1);
                assert_eq!(found, "number");
            }
            other => panic!("expected InvalidKey, got {other:?}"),
        }

        let err = Path::try_from(&json!(42)).unwrap_err();
        assert!(matches!(err, DeepStateError::InvalidPath { .. }));
    }

    #[test]
    fn test_push_key_validates() {
        let mut path = Path::root();
        path.push_key("a").unwrap();

        let err = path.push_key("b.c").unwrap_err();
        assert!(matches!(err, DeepStateError::InvalidKey { index: 1, .. }));
        let err = path.push_key("").unwrap_err();
        assert!(matches!(err, DeepStateError::InvalidKey { index: 1, .. }));
        assert_eq!(path, path!("a").unwrap());

        assert!(path!("a", "b.c").is_err());
        assert!(path!("").is_err());
    }

    #[test]
    fn test_path_serde() {
        let path = path!("users", "alice").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""users.alice""#);
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);

        let parsed: Path = serde_json::from_str(r#"["users","alice"]"#).unwrap();
        assert_eq!(path, parsed);

        assert!(serde_json::from_str::<Path>(r#"["users",1]"#).is_err());
    }

    #[test]
    fn test_path_serde_roundtrip_preserves_keys() {
        for path in [
            Path::root(),
            path!("a").unwrap(),
            path!("a", "b", " c").unwrap(),
            Path::parse("details.contact.email").unwrap(),
        ] {
            let json = serde_json::to_value(&path).unwrap();
            let back: Path = serde_json::from_value(json).unwrap();
            assert_eq!(back, path);
        }
    }
}
