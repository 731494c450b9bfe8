//! Transform plugins and their calling conventions.
//!
//! A plugin declares its calling convention when it is registered by being
//! wrapped in the matching [`Plugin`] variant:
//!
//! - [`DirectPlugin`] receives the whole [`PipelineFile`] and returns either a
//!   ready [`TransformOutput`] or a future resolving to one.
//! - [`CallbackPlugin`] receives the file's data and path plus a
//!   [`Completion`] it must complete exactly once.
//!
//! The convention is fixed for the plugin's lifetime. [`PluginInvoker`] hides
//! the difference and guards every call with a [`Watchdog`](crate::Watchdog).

mod invoker;
mod registry;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::BoxError;

pub use invoker::PluginInvoker;
pub use registry::{PluginPhase, PluginRegistry};

/// A file travelling through the build pipeline.
///
/// Owned by the pipeline; plugins and the invoker only borrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFile {
    pub path: PathBuf,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineFile {
    pub fn new(path: impl Into<PathBuf>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            error: None,
        }
    }
}

/// What a transform hook produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
}

impl TransformOutput {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, map: impl Into<String>) -> Self {
        self.source_map = Some(map.into());
        self
    }
}

/// Return value of a direct-style hook.
pub enum HookReturn {
    /// The hook finished synchronously.
    Ready(TransformOutput),
    /// The hook finishes later.
    Pending(BoxFuture<'static, Result<TransformOutput, BoxError>>),
}

impl HookReturn {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<TransformOutput, BoxError>> + Send + 'static,
    {
        HookReturn::Pending(future.boxed())
    }
}

impl From<TransformOutput> for HookReturn {
    fn from(output: TransformOutput) -> Self {
        HookReturn::Ready(output)
    }
}

impl std::fmt::Debug for HookReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookReturn::Ready(output) => f.debug_tuple("Ready").field(output).finish(),
            HookReturn::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Completion handle passed to callback-style hooks.
///
/// Consumed on completion, so a hook can report at most once. Dropping it
/// without completing fails the invocation.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<Result<TransformOutput, BoxError>>,
}

impl Completion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<TransformOutput, BoxError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn complete(self, result: Result<TransformOutput, BoxError>) {
        // The receiver is gone only if the invocation itself was dropped.
        let _ = self.tx.send(result);
    }

    pub fn ok(self, output: TransformOutput) {
        self.complete(Ok(output));
    }

    pub fn fail(self, error: impl Into<BoxError>) {
        self.complete(Err(error.into()));
    }
}

/// Plugin whose hooks take the file and return a value or a future.
pub trait DirectPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the plugin exposes a hook called `method`.
    fn supports(&self, method: &str) -> bool;

    fn call(&self, method: &str, file: &PipelineFile) -> Result<HookReturn, BoxError>;
}

/// Plugin whose hooks report through a [`Completion`].
pub trait CallbackPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the plugin exposes a hook called `method`.
    fn supports(&self, method: &str) -> bool;

    fn call(&self, method: &str, data: &str, path: &Path, done: Completion) -> Result<(), BoxError>;
}

/// Calling convention of a registered plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingConvention {
    Direct,
    Callback,
}

/// A registered plugin together with its calling convention.
#[derive(Clone)]
pub enum Plugin {
    Direct(Arc<dyn DirectPlugin>),
    Callback(Arc<dyn CallbackPlugin>),
}

impl Plugin {
    pub fn direct(plugin: impl DirectPlugin + 'static) -> Self {
        Plugin::Direct(Arc::new(plugin))
    }

    pub fn callback(plugin: impl CallbackPlugin + 'static) -> Self {
        Plugin::Callback(Arc::new(plugin))
    }

    /// Identity used in log lines.
    pub fn name(&self) -> &str {
        match self {
            Plugin::Direct(p) => p.name(),
            Plugin::Callback(p) => p.name(),
        }
    }

    pub fn convention(&self) -> CallingConvention {
        match self {
            Plugin::Direct(_) => CallingConvention::Direct,
            Plugin::Callback(_) => CallingConvention::Callback,
        }
    }

    pub fn supports(&self, method: &str) -> bool {
        match self {
            Plugin::Direct(p) => p.supports(method),
            Plugin::Callback(p) => p.supports(method),
        }
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("convention", &self.convention())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl DirectPlugin for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn supports(&self, method: &str) -> bool {
            method == "compile"
        }

        fn call(&self, _method: &str, file: &PipelineFile) -> Result<HookReturn, BoxError> {
            Ok(TransformOutput::new(file.data.to_uppercase()).into())
        }
    }

    struct Echo;

    impl CallbackPlugin for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn supports(&self, _method: &str) -> bool {
            true
        }

        fn call(&self, _method: &str, data: &str, _path: &Path, done: Completion) -> Result<(), BoxError> {
            done.ok(TransformOutput::new(data));
            Ok(())
        }
    }

    #[test]
    fn plugin_reports_declared_convention() {
        let direct = Plugin::direct(Upper);
        let callback = Plugin::callback(Echo);

        assert_eq!(direct.convention(), CallingConvention::Direct);
        assert_eq!(callback.convention(), CallingConvention::Callback);
        assert_eq!(direct.name(), "upper");
        assert!(direct.supports("compile"));
        assert!(!direct.supports("optimize"));
        assert_eq!(format!("{:?}", callback), r#"Plugin { name: "echo", convention: Callback }"#);
    }

    #[test]
    fn completion_delivers_once() {
        let (done, mut rx) = Completion::channel();
        done.fail("bad input");
        let received = rx.try_recv().unwrap();
        assert_eq!(received.unwrap_err().to_string(), "bad input");
    }

    #[test]
    fn dropped_completion_closes_channel() {
        let (done, mut rx) = Completion::channel();
        drop(done);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn transform_output_builder() {
        let output = TransformOutput::new("body{}").with_source_map("{}");
        assert_eq!(output.data, "body{}");
        assert_eq!(output.source_map.as_deref(), Some("{}"));
        assert!(matches!(HookReturn::from(output), HookReturn::Ready(_)));
    }
}
