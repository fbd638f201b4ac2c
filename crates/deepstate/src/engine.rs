//! Config-carrying entry point for updates.

use crate::error::value_type_name;
use crate::update::write_through;
use crate::{merge_deep, DeepStateConfig, DeepStateResult, Path, Record, Update, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

/// Applies updates under a [`DeepStateConfig`].
///
/// The engine is stateless apart from its configuration; every method is a
/// pure function of its arguments.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: DeepStateConfig,
}

impl Engine {
    pub fn new(config: DeepStateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeepStateConfig {
        &self.config
    }

    /// Parse a dot-path under this engine's empty-segment policy.
    pub fn parse_path(&self, path: &str) -> DeepStateResult<Path> {
        Path::parse_with(path, self.config.empty_segments)
    }

    /// Update the value at a dot-path. See [`crate::update`].
    pub fn update(
        &self,
        root: &Value,
        value: impl Into<Value>,
        path: &str,
        merge: bool,
    ) -> DeepStateResult<Value> {
        let path = self.parse_path(path)?;
        Ok(self.update_at(root, value, &path, merge))
    }

    /// Update the value at a parsed path. See [`crate::update_at`].
    pub fn update_at(
        &self,
        root: &Value,
        value: impl Into<Value>,
        path: &Path,
        merge: bool,
    ) -> Value {
        let value = value.into();
        trace!(path = %path, merge, "applying state update");

        let Some((last, spine)) = path.split_last() else {
            return match (root, value) {
                (Value::Record(target), Value::Record(source)) if merge => {
                    Value::Record(merge_deep(target, &source))
                }
                (_, value) => value,
            };
        };

        match root {
            Value::Record(record) => {
                Value::Record(write_through(record, spine, last, value, merge))
            }
            other => {
                if self.config.warn_on_noop {
                    warn!(
                        path = %path,
                        root_type = value_type_name(other),
                        "ignoring path update: root is not a record"
                    );
                }
                other.clone()
            }
        }
    }

    /// Apply an update descriptor.
    pub fn apply(&self, root: &Value, update: &Update) -> Value {
        self.update_at(root, update.value.clone(), &update.path, update.merge)
    }

    /// Deep-merge two records. See [`crate::merge_deep`].
    pub fn merge(&self, target: &Record, source: &Record) -> Record {
        merge_deep(target, source)
    }

    /// Update a typed root by round-tripping it through the state tree.
    ///
    /// Fails with `Serialization` if `root` or `value` cannot be represented
    /// as JSON, or if the updated tree no longer deserializes as `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deepstate::Engine;
    /// use serde::{Deserialize, Serialize};
    /// use serde_json::json;
    ///
    /// #[derive(Debug, PartialEq, Serialize, Deserialize)]
    /// struct Profile {
    ///     name: String,
    ///     city: String,
    /// }
    ///
    /// let profile = Profile { name: "Bob".into(), city: "London".into() };
    /// let next = Engine::default()
    ///     .update_typed(&profile, &json!({"city": "Seoul"}), "", true)
    ///     .unwrap();
    /// assert_eq!(next, Profile { name: "Bob".into(), city: "Seoul".into() });
    /// ```
    pub fn update_typed<T, V>(
        &self,
        root: &T,
        value: &V,
        path: &str,
        merge: bool,
    ) -> DeepStateResult<T>
    where
        T: Serialize + DeserializeOwned,
        V: Serialize + ?Sized,
    {
        let path = self.parse_path(path)?;
        let root = Value::from(serde_json::to_value(root)?);
        let value = Value::from(serde_json::to_value(value)?);
        let next = self.update_at(&root, value, &path, merge);
        Ok(serde_json::from_value(next.to_json())?)
    }
}
