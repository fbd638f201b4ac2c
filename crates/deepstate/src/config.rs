//! Engine configuration.

use crate::DeepStateResult;
use serde::{Deserialize, Serialize};

/// How dot-path parsing treats empty segments (`"a..b"`, `".a"`, `"a."`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySegmentPolicy {
    /// Fail with `InvalidPath`.
    #[default]
    Reject,
    /// Drop empty segments. A path made only of dots becomes the root.
    Skip,
}

/// Configuration for an [`Engine`](crate::Engine).
///
/// All fields have defaults, so a partial JSON document is accepted:
///
/// ```
/// use deepstate::{DeepStateConfig, EmptySegmentPolicy};
///
/// let config = DeepStateConfig::from_json_str(r#"{"empty_segments": "skip"}"#).unwrap();
/// assert_eq!(config.empty_segments, EmptySegmentPolicy::Skip);
/// assert!(config.warn_on_noop);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepStateConfig {
    /// Policy for empty path segments.
    pub empty_segments: EmptySegmentPolicy,
    /// Emit a `tracing` warning when a path update is ignored because the
    /// root is not a record.
    pub warn_on_noop: bool,
}

impl Default for DeepStateConfig {
    fn default() -> Self {
        Self {
            empty_segments: EmptySegmentPolicy::Reject,
            warn_on_noop: true,
        }
    }
}

impl DeepStateConfig {
    /// Decode a configuration from JSON.
    pub fn from_json_str(s: &str) -> DeepStateResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    #[must_use]
    pub fn with_empty_segments(mut self, policy: EmptySegmentPolicy) -> Self {
        self.empty_segments = policy;
        self
    }

    #[must_use]
    pub fn with_warn_on_noop(mut self, warn: bool) -> Self {
        self.warn_on_noop = warn;
        self
    }
}
