//! Command implementations for the kiln CLI.
//!
//! - [`summarize`] - render the summary line of a pass snapshot
//! - [`config`] - print the effective configuration or its schema
//!
//! Each command provides an `execute` function taking its parsed arguments.
//! Command output goes to stdout; status messages go to stderr.

pub mod config;
pub mod summarize;

pub use config::execute as config_execute;
pub use summarize::execute as summarize_execute;
