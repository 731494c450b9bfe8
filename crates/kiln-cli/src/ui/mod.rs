//! Terminal output helpers.
//!
//! Status messages go to stderr so command output on stdout stays
//! machine-readable.
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("configuration is valid");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether status messages are colored.
///
/// `--no-color` turns colors off; otherwise the environment and terminal
/// decide (see [`crate::logger::should_use_colors`]).
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
