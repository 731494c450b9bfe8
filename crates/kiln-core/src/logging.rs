//! Subscriber setup for applications embedding kiln.
//!
//! Only available with the `logging` feature. Libraries should install their
//! own subscriber; kiln itself only emits `tracing` events.

use std::sync::Once;

use kiln_config::GlobalSettings;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Verbosity of kiln output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Slow-plugin warnings only
    Warn,
    /// Warnings, progress ticks and pass summaries
    #[default]
    Info,
    /// Adds timer and invocation lifecycle events
    Debug,
    Trace,
}

impl LogLevel {
    fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Level named in `settings.log_level`, if it is set and valid.
    pub fn from_settings(settings: &GlobalSettings) -> Option<Self> {
        settings.log_level.as_deref().and_then(|level| level.parse().ok())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "off" | "none" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level `{}`", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Install a compact subscriber at `level`; `RUST_LOG` directives still apply.
///
/// Only the first call in a process has any effect.
///
/// ```rust,no_run
/// use kiln_core::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Warn);
/// ```
pub fn init_logging(level: LogLevel) {
    install(
        EnvFilter::builder()
            .with_default_directive(level.as_level_filter().into())
            .from_env_lossy(),
    );
}

/// Install a subscriber configured by `RUST_LOG`, falling back to info.
pub fn init_logging_from_env() {
    install(
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.to_string())),
    );
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}
