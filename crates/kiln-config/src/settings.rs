//! Global settings shared by every kiln command.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GlobalSettings {
    /// Log level used when neither `--verbose`, `--quiet` nor `RUST_LOG` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Disable ANSI colors in log output
    #[serde(default)]
    pub no_color: bool,
}
