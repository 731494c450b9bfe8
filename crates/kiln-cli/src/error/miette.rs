//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use kiln_config::ConfigError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(ConfigError::InvalidValue { field, hint: Some(hint) }) => {
            miette::miette!(help = hint, "Invalid configuration value for '{}'", field)
        }
        CliError::Config(ConfigError::Extract(e)) => miette::miette!(
            help = "Check kiln.toml, the \"kiln\" field of package.json and KILN_* environment variables",
            "Configuration error: {}",
            e
        ),
        CliError::Snapshot(e) => miette::miette!(
            help = "A snapshot needs \"startTime\" in epoch milliseconds; \"assets\", \"generatedFiles\" and \"disposed\" are optional",
            "Invalid pass snapshot: {}",
            e
        ),
        CliError::FileNotFound(path) => {
            miette::miette!(help = "Pass `-` to read the snapshot from stdin", "File not found: {}", path.display())
        }
        _ => miette::miette!("{}", err),
    }
}
