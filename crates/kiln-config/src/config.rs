//! Reporter configuration: watchdog and progress timing plus global settings.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::settings::GlobalSettings;

/// Default interval between "is taking too long" warnings for a pending plugin call.
pub const DEFAULT_WATCHDOG_INTERVAL_MS: u64 = 15_000;

/// Default tick interval of the "compiling..." progress animation.
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 4_000;

/// Configuration consumed by the kiln reporting core.
///
/// Loaded from `kiln.toml` (or the `kiln` field of `package.json`) and
/// `KILN_*` environment variables. Every field has a default, so an empty
/// file is a valid configuration.
///
/// # Example
///
/// ```
/// use kiln_config::ReporterConfig;
/// use serde_json::json;
///
/// let config = ReporterConfig::from_value(json!({ "progress": false })).unwrap();
/// assert!(!config.progress);
/// assert_eq!(config.watchdog_interval_ms, 15_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    /// Interval between slow-plugin warnings, in milliseconds
    #[serde(default = "default_watchdog_interval_ms")]
    pub watchdog_interval_ms: u64,

    /// Tick interval of the progress animation, in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Show the animated "compiling..." status while a pass is running
    #[serde(default = "default_progress")]
    pub progress: bool,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            watchdog_interval_ms: default_watchdog_interval_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            progress: default_progress(),
            settings: GlobalSettings::default(),
        }
    }
}

impl ReporterConfig {
    /// Create from a `serde_json::Value`, validating the result.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: ReporterConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                field: "config".to_string(),
                hint: Some(e.to_string()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the reporter cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.watchdog_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watchdog_interval_ms".to_string(),
                hint: Some("must be greater than zero".to_string()),
            });
        }
        if self.progress_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval_ms".to_string(),
                hint: Some("must be greater than zero".to_string()),
            });
        }
        Ok(())
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// JSON Schema for `kiln.toml`.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ReporterConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}

fn default_watchdog_interval_ms() -> u64 {
    DEFAULT_WATCHDOG_INTERVAL_MS
}

fn default_progress_interval_ms() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_MS
}

fn default_progress() -> bool {
    true
}
