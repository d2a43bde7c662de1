//! # Guard Policy
//!
//! Configuration for how a declared guard set is ordered before
//! evaluation. The only knob today is the relative order of pause checks
//! and lock acquisition.
//!
//! ```yaml
//! order: pause_then_lock   # or lock_then_pause
//! ```
//!
//! The default, `pause_then_lock`, never acquires the lock for a call that
//! the pause gate is about to reject.

use std::path::Path;

use serde::{Deserialize, Serialize};

use bulwark_core::BulwarkError;

/// Relative order of pause checks and the reentrancy lock in a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOrder {
    /// `whenNotPaused`/`whenPaused` first, then `nonReentrant`.
    #[default]
    PauseThenLock,
    /// `nonReentrant` first, then `whenNotPaused`/`whenPaused`.
    LockThenPause,
}

impl std::fmt::Display for GuardOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PauseThenLock => "pause_then_lock",
            Self::LockThenPause => "lock_then_pause",
        };
        f.write_str(s)
    }
}

/// Guard evaluation policy for a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardPolicy {
    /// Pause/lock ordering.
    pub order: GuardOrder,
}

impl GuardPolicy {
    /// Policy with an explicit order.
    pub fn new(order: GuardOrder) -> Self {
        Self { order }
    }

    /// Parse a policy from a YAML document. An empty document yields the
    /// default policy.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BulwarkError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| BulwarkError::Config(format!("invalid guard policy: {e}")))
    }

    /// Load a policy from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BulwarkError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            BulwarkError::Config(msg) => {
                BulwarkError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String, BulwarkError> {
        serde_yaml::to_string(self).map_err(|e| BulwarkError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_pause_then_lock() {
        assert_eq!(GuardPolicy::default().order, GuardOrder::PauseThenLock);
    }

    #[test]
    fn test_parse_lock_then_pause() {
        let policy = GuardPolicy::from_yaml_str("order: lock_then_pause\n").unwrap();
        assert_eq!(policy.order, GuardOrder::LockThenPause);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GuardPolicy::from_yaml_str("").unwrap(), GuardPolicy::default());
        assert_eq!(GuardPolicy::from_yaml_str("{}").unwrap(), GuardPolicy::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GuardPolicy::from_yaml_str("order: pause_then_lock\nretries: 3\n").unwrap_err();
        assert!(matches!(err, BulwarkError::Config(_)));
    }

    #[test]
    fn test_unknown_order_rejected() {
        assert!(GuardPolicy::from_yaml_str("order: whenever\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let policy = GuardPolicy::new(GuardOrder::LockThenPause);
        let yaml = policy.to_yaml().unwrap();
        assert!(yaml.contains("lock_then_pause"));
        assert_eq!(GuardPolicy::from_yaml_str(&yaml).unwrap(), policy);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "order: lock_then_pause").unwrap();
        let policy = GuardPolicy::load(file.path()).unwrap();
        assert_eq!(policy.order, GuardOrder::LockThenPause);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GuardPolicy::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, BulwarkError::Io(_)));
    }
}
