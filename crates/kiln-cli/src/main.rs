//! Kiln CLI entry point: argument parsing, logging setup and command dispatch.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger, ui};
use kiln_core::LogLevel;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Settings from a config file only fill in what the flags leave open.
    let discovered = kiln_config::discover();
    let settings = discovered
        .as_ref()
        .map(|config| config.settings.clone())
        .unwrap_or_default();
    let no_color = args.no_color || settings.no_color;
    let default_level = LogLevel::from_settings(&settings).unwrap_or_default();

    logger::init_logger_with_default(args.verbose, args.quiet, no_color, default_level);
    ui::init_colors(no_color);

    if let Err(e) = &discovered {
        ui::warning(&format!("ignoring kiln config: {e}"));
    }

    let result = match args.command {
        cli::Command::Summarize(summarize_args) => commands::summarize_execute(summarize_args).await,
        cli::Command::Config(config_args) => commands::config_execute(config_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
