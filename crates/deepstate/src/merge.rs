//! Recursive record merge.

use crate::{Record, Value};

/// Deep-merge `source` into `target`, returning a new record (pure function).
///
/// For every key in `source`:
/// - a record value is merged recursively with the target's record at that
///   key, or with an empty record when the target has none there;
/// - any other value (scalar, array, null, undefined) overwrites the
///   target's entry. Arrays are replaced wholesale.
///
/// Keys only present in `target` are kept. Neither input is modified.
///
/// # Examples
///
/// ```
/// use deepstate::{merge_deep, Value};
/// use serde_json::json;
///
/// let target = Value::from(json!({"a": 1, "nested": {"x": 1, "y": 2}}));
/// let source = Value::from(json!({"b": 2, "nested": {"y": 20}}));
///
/// let merged = merge_deep(target.as_record().unwrap(), source.as_record().unwrap());
/// assert_eq!(
///     Value::Record(merged),
///     json!({"a": 1, "b": 2, "nested": {"x": 1, "y": 20}})
/// );
/// assert_eq!(target["nested"]["y"], 2);
/// ```
pub fn merge_deep(target: &Record, source: &Record) -> Record {
    let mut result = target.clone();

    for (key, value) in source {
        let merged = match value {
            Value::Record(src) => match target.get(key) {
                Some(Value::Record(existing)) => Value::Record(merge_deep(existing, src)),
                _ => Value::Record(merge_deep(&Record::new(), src)),
            },
            other => other.clone(),
        };
        result.insert(key.clone(), merged);
    }

    result
}

/// Merge two values if both are records, otherwise return `source`.
pub fn merge_values(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Record(t), Value::Record(s)) => Value::Record(merge_deep(t, s)),
        (_, source) => source.clone(),
    }
}
