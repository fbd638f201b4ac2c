//! Path-addressed updates.
//!
//! An update either replaces the value at a path or deep-merges a record
//! into the record already there. Updates are pure: the previous root is
//! never modified, and the new root shares every subtree the update did not
//! touch.

use crate::{merge_deep, DeepStateError, DeepStateResult, Engine, Path, Record, Value};
use serde::{Deserialize, Deserializer, Serialize};

/// Update the value at a dot-path (pure function).
///
/// - Empty path: deep-merge `value` into `root` when `merge` is set and both
///   are records; otherwise return `value`.
/// - Non-empty path on a non-record root: return `root` unchanged.
/// - Otherwise: descend along the path, turning every missing or non-record
///   position into an empty record, then merge or assign at the last key.
///
/// Fails only if the path is malformed; nothing is computed in that case.
///
/// # Examples
///
/// ```
/// use deepstate::{update, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"details": {"id": 0, "name": "Bob"}}));
///
/// let merged = update(&root, json!({"name": "Dave"}), "details", true).unwrap();
/// assert_eq!(merged, json!({"details": {"id": 0, "name": "Dave"}}));
///
/// let replaced = update(&root, json!({"name": "Dave"}), "details", false).unwrap();
/// assert_eq!(replaced, json!({"details": {"name": "Dave"}}));
///
/// // Original is unchanged
/// assert_eq!(root["details"]["name"], "Bob");
/// ```
pub fn update(
    root: &Value,
    value: impl Into<Value>,
    path: &str,
    merge: bool,
) -> DeepStateResult<Value> {
    Engine::default().update(root, value, path, merge)
}

/// Update the value at an already parsed path (pure function).
///
/// Same semantics as [`update`], minus path parsing, so it cannot fail.
pub fn update_at(root: &Value, value: impl Into<Value>, path: &Path, merge: bool) -> Value {
    Engine::default().update_at(root, value, path, merge)
}

/// Get a reference to the value at a path.
///
/// Returns `None` if any segment is missing or passes through a non-record.
/// An entry explicitly set to `Undefined` is returned as `Some`.
pub fn get_at_path<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.iter().try_fold(root, |current, key| current.get(key))
}

/// Copy-on-write descent from `root` to `last`, creating records along the
/// spine, then merge or assign at `last`.
pub(crate) fn write_through(
    root: &Record,
    spine: &[String],
    last: &str,
    value: Value,
    merge: bool,
) -> Record {
    let mut new_root = root.clone();

    let mut cursor = &mut new_root;
    for key in spine {
        cursor = cursor.child_record_mut(key);
    }

    let next = match (cursor.get(last), value) {
        (Some(Value::Record(existing)), Value::Record(source)) if merge => {
            Value::Record(merge_deep(existing, &source))
        }
        (_, value) => value,
    };
    cursor.insert(last, next);

    new_root
}

fn default_merge() -> bool {
    true
}

fn merge_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_merge))
}

/// A requested state transition: a value, where to put it, and whether to
/// merge.
///
/// # Examples
///
/// ```
/// use deepstate::{path, Update, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"user": {"name": "Alice", "age": 30}}));
///
/// let next = Update::new(json!({"age": 31})).at(path!("user").unwrap()).apply(&root);
/// assert_eq!(next, json!({"user": {"name": "Alice", "age": 31}}));
///
/// let next = Update::new(json!({"age": 31})).at(path!("user").unwrap()).replace().apply(&root);
/// assert_eq!(next, json!({"user": {"age": 31}}));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Update {
    /// New value. Absent means `Undefined`.
    #[serde(default, skip_serializing_if = "Value::is_undefined")]
    pub value: Value,
    /// Target location. Empty means the root.
    #[serde(default, skip_serializing_if = "Path::is_empty")]
    pub path: Path,
    /// Deep-merge records instead of replacing them.
    /// Absent or `null` means `true`.
    #[serde(default = "default_merge", deserialize_with = "merge_or_default")]
    pub merge: bool,
}

impl Update {
    /// Create a merging update at the root.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            path: Path::root(),
            merge: true,
        }
    }

    /// Create a merging update at a dot-path.
    pub fn parse(value: impl Into<Value>, path: &str) -> DeepStateResult<Self> {
        Ok(Self::new(value).at(Path::parse(path)?))
    }

    /// Set the target path (builder pattern).
    #[must_use]
    pub fn at(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Set the merge flag (builder pattern).
    #[must_use]
    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Replace instead of merging (builder pattern).
    #[must_use]
    pub fn replace(self) -> Self {
        self.merge(false)
    }

    /// Decode an update descriptor from JSON.
    ///
    /// Unlike `serde_json::from_value`, path problems are reported as
    /// `InvalidKey` / `InvalidPath` rather than as serialization errors.
    pub fn from_json(json: &serde_json::Value) -> DeepStateResult<Self> {
        let obj = json.as_object().ok_or_else(|| {
            DeepStateError::invalid_update(format!(
                "expected object, found {}",
                crate::error::json_type_name(json)
            ))
        })?;

        if let Some(unknown) = obj
            .keys()
            .find(|k| !matches!(k.as_str(), "value" | "path" | "merge"))
        {
            return Err(DeepStateError::invalid_update(format!(
                "unknown field '{unknown}'"
            )));
        }

        let value = obj.get("value").map(Value::from).unwrap_or_default();
        let path = match obj.get("path") {
            Some(raw) => Path::try_from(raw)?,
            None => Path::root(),
        };
        let merge = match obj.get("merge") {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(other) => {
                return Err(DeepStateError::invalid_update(format!(
                    "merge must be a boolean, found {}",
                    crate::error::json_type_name(other)
                )));
            }
        };

        Ok(Self { value, path, merge })
    }

    /// Apply this update to `root` with the default engine.
    pub fn apply(&self, root: &Value) -> Value {
        Engine::default().apply(root, self)
    }
}
