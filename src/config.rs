//! Store configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "store";
const DEFAULT_MAX_QUEUED_DISPATCHES: usize = 1024;

/// Settings for a [`Store`](crate::Store).
///
/// Deserializable so an application can keep it in its own config file:
///
/// ```toml
/// name = "app"
/// log_actions = true
/// max_queued_dispatches = 64
/// ```
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix of every log line the store writes.
    pub name: String,
    /// Log each dispatched action at debug level.
    pub log_actions: bool,
    /// Limit on actions dispatched from subscribers that wait for the
    /// running dispatch to finish.
    pub max_queued_dispatches: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            log_actions: false,
            max_queued_dispatches: DEFAULT_MAX_QUEUED_DISPATCHES,
        }
    }
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_log_actions(mut self, log_actions: bool) -> Self {
        self.log_actions = log_actions;
        self
    }

    pub fn with_max_queued_dispatches(mut self, limit: usize) -> Self {
        self.max_queued_dispatches = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.name, "store");
        assert!(!config.log_actions);
        assert_eq!(config.max_queued_dispatches, 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: StoreConfig = toml::from_str("name = \"counter\"\nlog_actions = true\n").unwrap();
        assert_eq!(
            config,
            StoreConfig::new("counter").with_log_actions(true)
        );
    }

    #[test]
    fn full_toml() {
        let config: StoreConfig = toml::from_str(
            r#"
            name = "app"
            log_actions = false
            max_queued_dispatches = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.max_queued_dispatches, 8);
        assert_eq!(config.name, "app");
    }
}
