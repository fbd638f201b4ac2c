//! Value cell holding the current root.
//!
//! `StateCell` wraps a `Mutex<Value>` so that each update runs as one
//! read-compute-write transition. Reads return snapshots; since records are
//! persistent, a snapshot costs a reference-count bump.

use crate::{DeepStateError, DeepStateResult, Engine, Update, Value};
use serde::de::DeserializeOwned;
use std::sync::{Mutex, MutexGuard};

/// Holder of the current state root.
///
/// # Examples
///
/// ```
/// use deepstate::{StateCell, Value};
/// use serde_json::json;
///
/// let cell = StateCell::new(json!({"user": {"name": "John", "active": true}}));
/// let before = cell.get().unwrap();
///
/// cell.update(json!({"name": "Jane"}), "user", true).unwrap();
///
/// assert_eq!(cell.get().unwrap(), json!({"user": {"name": "Jane", "active": true}}));
/// assert_eq!(before["user"]["name"], "John");
/// ```
pub struct StateCell {
    root: Mutex<Value>,
    engine: Engine,
}

impl StateCell {
    /// Create a cell with the default engine.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_engine(initial, Engine::default())
    }

    /// Create a cell that applies updates with `engine`.
    pub fn with_engine(initial: impl Into<Value>, engine: Engine) -> Self {
        Self {
            root: Mutex::new(initial.into()),
            engine,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn lock(&self) -> DeepStateResult<MutexGuard<'_, Value>> {
        self.root.lock().map_err(|_| DeepStateError::CellPoisoned)
    }

    /// Snapshot of the current root.
    pub fn get(&self) -> DeepStateResult<Value> {
        Ok(self.lock()?.clone())
    }

    /// Deserialize the current root as `T`.
    pub fn get_as<T: DeserializeOwned>(&self) -> DeepStateResult<T> {
        let json = self.lock()?.to_json();
        Ok(serde_json::from_value(json)?)
    }

    /// Apply an update descriptor and store the result.
    pub fn set(&self, update: &Update) -> DeepStateResult<()> {
        let mut guard = self.lock()?;
        let next = self.engine.apply(&guard, update);
        *guard = next;
        Ok(())
    }

    /// Update the value at a dot-path and store the result.
    ///
    /// On error the stored root is left as it was.
    pub fn update(&self, value: impl Into<Value>, path: &str, merge: bool) -> DeepStateResult<()> {
        let path = self.engine.parse_path(path)?;
        let mut guard = self.lock()?;
        let next = self.engine.update_at(&guard, value, &path, merge);
        *guard = next;
        Ok(())
    }

    /// Store a new root, returning the previous one.
    pub fn replace(&self, root: impl Into<Value>) -> DeepStateResult<Value> {
        let mut guard = self.lock()?;
        Ok(std::mem::replace(&mut *guard, root.into()))
    }

    /// Consume the cell and return the current root.
    pub fn into_inner(self) -> DeepStateResult<Value> {
        self.root
            .into_inner()
            .map_err(|_| DeepStateError::CellPoisoned)
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(Value::Undefined)
    }
}

impl std::fmt::Debug for StateCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("root", &"<Value>")
            .field("engine", &self.engine)
            .finish()
    }
}
