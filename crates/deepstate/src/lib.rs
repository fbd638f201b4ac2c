//! Path-addressable immutable updates for nested state trees.
//!
//! `deepstate` updates a nested key-value tree at a dot-delimited path,
//! either replacing the value there or deep-merging a record into it, and
//! returns a new root. The previous root is never mutated.
//!
//! # Core Concepts
//!
//! - **Value**: a state tree node; records are persistent and share
//!   untouched subtrees between versions
//! - **Path**: a parsed dot-path such as `"details.contact.email"`
//! - **update**: merge-or-replace at a path (pure function)
//! - **merge_deep**: recursive record merge (pure function)
//! - **Update**: a serializable update descriptor
//! - **Engine**: applies updates under a [`DeepStateConfig`]
//! - **StateCell**: holder of the current root
//!
//! # Update rules
//!
//! ```text
//! path empty,     merge && both records  -> merge_deep(root, value)
//! path empty,     otherwise              -> value
//! path non-empty, root not a record      -> root (no-op)
//! path non-empty, root a record          -> descend, then merge or assign at the last key
//! ```
//!
//! # Quick Start
//!
//! ```
//! use deepstate::{update, Value};
//! use serde_json::json;
//!
//! let root = Value::from(json!({
//!     "details": {
//!         "id": 0,
//!         "name": "Bob",
//!         "contact": {"email": "bob@example.com", "tel": "123"}
//!     }
//! }));
//!
//! // Merge (default)
//! let next = update(&root, json!({"name": "Dave"}), "details", true).unwrap();
//! assert_eq!(next["details"]["name"], "Dave");
//! assert_eq!(next["details"]["contact"]["tel"], "123");
//!
//! // Replace
//! let next = update(&root, json!({"id": 1}), "details", false).unwrap();
//! assert_eq!(next, json!({"details": {"id": 1}}));
//!
//! // Original unchanged
//! assert_eq!(root["details"]["name"], "Bob");
//! ```

mod cell;
mod config;
mod engine;
mod error;
mod merge;
mod path;
mod update;
mod value;

pub use cell::StateCell;
pub use config::{DeepStateConfig, EmptySegmentPolicy};
pub use engine::Engine;
pub use error::{value_type_name, DeepStateError, DeepStateResult};
pub use merge::{merge_deep, merge_values};
pub use path::Path;
pub use update::{get_at_path, update, update_at, Update};
pub use value::{Record, Value};
