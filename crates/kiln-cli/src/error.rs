//! Error handling for the kiln CLI.
//!
//! Commands return [`CliError`]; `main` turns it into a miette report via
//! [`cli_error_to_miette`].
//!
//! ```rust,no_run
//! use kiln_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_snapshot(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reporter configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] kiln_config::ConfigError),

    /// The pass snapshot is not valid JSON or has the wrong shape
    #[error("Invalid pass snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Report a missing file as [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}
