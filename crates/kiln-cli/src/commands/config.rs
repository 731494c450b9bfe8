//! Config command implementation.
//!
//! Prints the configuration the reporter would run with in a directory, or
//! the JSON schema of `kiln.toml`.

use std::path::PathBuf;

use kiln_config::{ConfigDiscovery, ReporterConfig};

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the config command.
///
/// # Errors
///
/// Returns errors for a missing root directory or a config that fails to
/// load or validate.
pub async fn execute(args: ConfigArgs) -> Result<()> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&ReporterConfig::json_schema())?);
        return Ok(());
    }

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = effective_config(root)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Load the configuration for `root`, reporting which file was used.
pub fn effective_config(root: PathBuf) -> Result<ReporterConfig> {
    if !root.is_dir() {
        return Err(CliError::FileNotFound(root));
    }

    let discovery = ConfigDiscovery::new(&root);
    match discovery.find() {
        Some(path) => ui::info(&format!("using {}", path.display())),
        None => ui::warning("no kiln.toml or package.json \"kiln\" field found, using defaults"),
    }

    let config = discovery.load()?;
    ui::success("configuration is valid");
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}
