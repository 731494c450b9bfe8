//! Command-line interface definition for kiln.
//!
//! - `kiln summarize` - render the summary line of a finished pass
//! - `kiln config` - print the effective reporter configuration or its schema

mod commands;

use clap::Parser;

pub use commands::{Command, ConfigArgs, SummarizeArgs};

/// Kiln - build pass reporting
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Build pass reporting: summaries, progress and slow-plugin warnings",
    long_about = "Kiln reports on build passes: it renders the one-line summary of a\n\
                  finished pass and shows the reporter configuration that applies in\n\
                  a project directory."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or systems that don't support colored terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
