#![cfg_attr(docsrs, feature(doc_cfg))]

//! # kiln-core
//!
//! Reporting core of the kiln build pipeline.
//!
//! - [`Watchdog`] warns repeatedly while a guarded operation is pending
//! - [`PluginInvoker`] calls plugin hooks of either calling convention under a watchdog
//! - [`ProgressAnimator`] shows a "compiling..." ticker while a pass runs
//! - [`summarize`] renders the one-line summary of a finished pass
//! - [`PassReporter`] ties the above together for successive passes
//!
//! Timers go through a [`Scheduler`] and output through a [`LogSink`], so
//! tests can use [`ManualScheduler`] and [`MemorySink`] instead of real time
//! and a real subscriber.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kiln_core::{PipelineFile, Plugin, PluginInvoker, PluginPhase, PluginRegistry};
//! # use kiln_core::{BoxError, DirectPlugin, HookReturn, TransformOutput};
//! # struct Minify;
//! # impl DirectPlugin for Minify {
//! #     fn name(&self) -> &str { "minify" }
//! #     fn supports(&self, method: &str) -> bool { method == "optimize" }
//! #     fn call(&self, _: &str, file: &PipelineFile) -> Result<HookReturn, BoxError> {
//! #         Ok(TransformOutput::new(file.data.trim()).into())
//! #     }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = PluginRegistry::new();
//! registry.add(PluginPhase::Optimize, Plugin::direct(Minify));
//!
//! let file = PipelineFile::new("app/main.js", "  let x = 1;  ");
//! let output = PluginInvoker::default().run_pipeline(&registry, &file).await?;
//! assert_eq!(output.data, "let x = 1;");
//! # Ok(()) }
//! ```

pub mod error;
pub mod pass;
pub mod plugin;
pub mod progress;
pub mod scheduler;
pub mod sink;
pub mod summary;
pub mod watchdog;

pub use error::{BoxError, InvokeError, Result};
pub use pass::{Pass, PassReporter};
pub use plugin::{
    CallbackPlugin, CallingConvention, Completion, DirectPlugin, HookReturn, PipelineFile, Plugin,
    PluginInvoker, PluginPhase, PluginRegistry, TransformOutput,
};
pub use progress::{ProgressAnimator, ProgressHandle, progress_line};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use sink::{LogSink, MemorySink, Severity, TracingSink};
pub use summary::{
    Asset, DisposedFiles, GeneratedFile, PassClassification, PassSnapshot, SourceFile, summarize,
    summarize_at,
};
pub use watchdog::Watchdog;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
