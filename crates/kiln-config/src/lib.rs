//! Configuration for the kiln build reporter.
//!
//! Settings are layered from defaults, a discovered config file and `KILN_`
//! environment variables. See [`ConfigDiscovery`] for the lookup rules.

pub mod config;
pub mod discovery;
pub mod error;
pub mod settings;

// Re-export main types
pub use config::*;
pub use error::*;
pub use settings::*;

pub use discovery::{ConfigDiscovery, discover};
