//! Shell configuration embedded at build time from `shell.config.toml`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{model::DEFAULT_LANGUAGE, persistence::GLOBAL_NOTIFICATION_MARKER_KEY};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/shell_config_generated.rs"));
}

/// Schema version accepted by [`ShellConfig::from_json`].
pub const SHELL_CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an embedded configuration document is rejected.
pub enum ConfigError {
    #[error("invalid shell config: {0}")]
    Parse(String),
    #[error("unsupported shell config schema {found} (expected {expected})")]
    Schema { expected: u32, found: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub schema_version: u32,
    pub title: String,
    /// Fallback icon for applications without one.
    pub logo: String,
    pub inventory_endpoint: String,
    pub notification_endpoint: String,
    pub notification_poll_interval_ms: u32,
    /// Maximum time a pending message waits for its frame.
    pub pending_message_ttl_ms: u32,
    pub pending_sweep_interval_ms: u32,
    pub default_language: String,
    pub notification_marker_key: String,
    /// Application opened by the account balance shortcut.
    pub cost_center_app_key: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            schema_version: SHELL_CONFIG_SCHEMA_VERSION,
            title: "Cloud Desktop".to_string(),
            logo: "/logo.svg".to_string(),
            inventory_endpoint: "/api/desktop/getInstalledApps".to_string(),
            notification_endpoint: "/api/platform/getGlobalNotification".to_string(),
            notification_poll_interval_ms: 5 * 60 * 1000,
            pending_message_ttl_ms: 30_000,
            pending_sweep_interval_ms: 5_000,
            default_language: DEFAULT_LANGUAGE.to_string(),
            notification_marker_key: GLOBAL_NOTIFICATION_MARKER_KEY.to_string(),
            cost_center_app_key: "system-costcenter".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or a schema version mismatch.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        if config.schema_version != SHELL_CONFIG_SCHEMA_VERSION {
            return Err(ConfigError::Schema {
                expected: SHELL_CONFIG_SCHEMA_VERSION,
                found: config.schema_version,
            });
        }
        Ok(config)
    }

    /// Loads the build-time configuration, falling back to defaults when it does not parse.
    pub fn embedded() -> Self {
        Self::from_json(generated::SHELL_CONFIG_JSON).unwrap_or_else(|err| {
            leptos::logging::warn!("{err}; using default shell config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = ShellConfig::from_json(generated::SHELL_CONFIG_JSON).expect("embedded");
        assert_eq!(config.notification_marker_key, "GlobalNotification");
        assert_eq!(config.inventory_endpoint, "/api/desktop/getInstalledApps");
        assert!(config.pending_message_ttl_ms > 0);
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let mut value = serde_json::to_value(ShellConfig::default()).expect("to value");
        value["schema_version"] = serde_json::json!(2);

        assert_eq!(
            ShellConfig::from_json(&value.to_string()),
            Err(ConfigError::Schema {
                expected: 1,
                found: 2
            })
        );
        assert!(matches!(
            ShellConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
