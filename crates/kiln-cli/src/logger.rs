//! Logging setup for the kiln CLI.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for kiln crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. the default level (`settings.log_level` from the config, else info)
//!
//! ```rust,no_run
//! use kiln_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("compiled main.js into app.js in 120 ms");
//! ```

use kiln_core::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const KILN_CRATES: [&str; 3] = ["kiln_core", "kiln_config", "kiln_cli"];

/// Initialize the tracing subscriber with the default level of info.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_default(verbose, quiet, no_color, LogLevel::Info);
}

/// Initialize the tracing subscriber, using `default` when neither a flag
/// nor `RUST_LOG` picks a level.
pub fn init_logger_with_default(verbose: bool, quiet: bool, no_color: bool, default: LogLevel) {
    let filter = if verbose {
        EnvFilter::new(directives(LogLevel::Debug))
    } else if quiet {
        EnvFilter::new(directives(LogLevel::Error))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(default)))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Filter directives applying `level` to every kiln crate.
pub fn directives(level: LogLevel) -> String {
    KILN_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_directives_cover_every_crate() {
        assert_eq!(
            directives(LogLevel::Debug),
            "kiln_core=debug,kiln_config=debug,kiln_cli=debug"
        );
        assert_eq!(directives(LogLevel::Silent), "kiln_core=off,kiln_config=off,kiln_cli=off");
    }

    #[test]
    fn test_directives_parse_as_filter() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Trace] {
            assert!(EnvFilter::try_new(directives(level)).is_ok());
        }
    }

    #[test]
    #[serial]
    fn test_no_color_wins_over_force_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());

        unsafe {
            std::env::remove_var("NO_COLOR");
        }
        assert!(should_use_colors());

        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }
}
