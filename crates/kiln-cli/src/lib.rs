//! Kiln CLI - pass summaries and reporter configuration from the command line.
//!
//! - [`error`] - CLI error type and its miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status messages
//! - `commands` - `summarize` and `config`
//!
//! # Example
//!
//! ```rust
//! use kiln_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
