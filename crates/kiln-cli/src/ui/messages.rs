//! Status messages on stderr.

use owo_colors::OwoColorize;

use super::colors_enabled;

/// Print a success message to stderr.
pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {}", message);
    }
}

/// Print an info message to stderr.
///
/// ```no_run
/// use kiln_cli::ui::info;
///
/// info("using kiln.toml");
/// ```
pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {}", message);
    }
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {}", message);
    }
}
