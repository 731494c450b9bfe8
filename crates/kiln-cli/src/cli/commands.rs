use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available kiln subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the summary line of a finished pass
    ///
    /// Reads a pass snapshot (start time, copied assets, generated files and
    /// disposed files) as JSON and prints the line kiln logs at the end of
    /// the pass.
    Summarize(SummarizeArgs),

    /// Show the effective reporter configuration
    ///
    /// Layers defaults, kiln.toml (or the "kiln" field of package.json) and
    /// KILN_* environment variables, then prints the result as JSON.
    Config(ConfigArgs),
}

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Pass snapshot JSON file, or `-` to read from stdin
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Clock reading in milliseconds since the Unix epoch
    ///
    /// Pins the elapsed time so the output is reproducible. Defaults to the
    /// current time.
    #[arg(long, value_name = "MS")]
    pub now_ms: Option<i64>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Directory to look for kiln.toml or package.json in
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print the JSON schema of the configuration instead
    #[arg(long)]
    pub schema: bool,
}
