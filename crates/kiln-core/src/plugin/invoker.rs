//! Watchdog-guarded plugin invocation.

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use super::{Completion, HookReturn, PipelineFile, Plugin, PluginRegistry, TransformOutput};
use crate::error::{InvokeError, Result};
use crate::watchdog::Watchdog;

/// Calls plugin hooks under either calling convention.
///
/// Every call is guarded by the watchdog, which warns with
/// `"<plugin> is taking too long to <method> @ <path>"` while the hook is
/// pending. Failures are returned as they came from the plugin: no retry and
/// no rewording.
#[derive(Debug, Clone, Default)]
pub struct PluginInvoker {
    watchdog: Watchdog,
}

impl PluginInvoker {
    pub fn new(watchdog: Watchdog) -> Self {
        Self { watchdog }
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Invoke `method` of `plugin` on `file`.
    ///
    /// # Errors
    ///
    /// - [`InvokeError::Plugin`] when the hook returns an error, its future
    ///   fails, or it completes its callback with an error
    /// - [`InvokeError::MissingHook`] when the plugin has no such hook
    /// - [`InvokeError::CallbackDropped`] when a callback-style hook drops its
    ///   completion without reporting
    pub async fn invoke(&self, plugin: &Plugin, method: &str, file: &PipelineFile) -> Result<TransformOutput> {
        if !plugin.supports(method) {
            return Err(InvokeError::MissingHook {
                plugin: plugin.name().to_string(),
                method: method.to_string(),
            });
        }

        tracing::debug!(plugin = plugin.name(), method, path = %file.path.display(), "invoking plugin");

        let operation = start(plugin, method, file)?;
        let message = slow_message(plugin, method, file);
        let result = self.watchdog.guard(operation, message).await;

        if let Err(err) = &result {
            tracing::debug!(plugin = plugin.name(), method, "plugin failed: {}", err);
        }
        result
    }

    /// Run every plugin of `registry` over `file` in phase order.
    ///
    /// Each phase invokes its own hook method; plugins without that hook are
    /// skipped. Each hook sees the previous hook's output. Stops at the first
    /// failure.
    pub async fn run_pipeline(&self, registry: &PluginRegistry, file: &PipelineFile) -> Result<PipelineFile> {
        let mut current = file.clone();

        for (phase, plugin) in registry.iter() {
            let method = phase.method();
            if !plugin.supports(method) {
                continue;
            }

            let output = self.invoke(plugin, method, &current).await?;
            current.data = output.data;
        }

        Ok(current)
    }
}

fn slow_message(plugin: &Plugin, method: &str, file: &PipelineFile) -> String {
    format!(
        "{} is taking too long to {} @ {}",
        plugin.name(),
        method,
        file.path.display()
    )
}

/// Start the hook and turn it into a single pending operation.
///
/// A hook that fails while being called is returned as an error straight away.
fn start(plugin: &Plugin, method: &str, file: &PipelineFile) -> Result<BoxFuture<'static, Result<TransformOutput>>> {
    match plugin {
        Plugin::Direct(hook) => match hook.call(method, file).map_err(InvokeError::Plugin)? {
            HookReturn::Ready(output) => Ok(future::ready(Ok(output)).boxed()),
            HookReturn::Pending(pending) => Ok(pending.map(|r| r.map_err(InvokeError::Plugin)).boxed()),
        },
        Plugin::Callback(hook) => {
            let (done, rx) = Completion::channel();
            hook.call(method, &file.data, &file.path, done)
                .map_err(InvokeError::Plugin)?;

            let dropped = InvokeError::CallbackDropped {
                plugin: plugin.name().to_string(),
                method: method.to_string(),
                path: file.path.clone(),
            };
            Ok(async move {
                match rx.await {
                    Ok(result) => result.map_err(InvokeError::Plugin),
                    Err(_) => Err(dropped),
                }
            }
            .boxed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{CallingConvention, DirectPlugin};
    use crate::error::BoxError;

    struct Failing;

    impl DirectPlugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn supports(&self, method: &str) -> bool {
            method == "compile"
        }

        fn call(&self, _method: &str, _file: &PipelineFile) -> std::result::Result<HookReturn, BoxError> {
            Err("syntax error".into())
        }
    }

    #[test]
    fn slow_message_format() {
        let plugin = Plugin::direct(Failing);
        let file = PipelineFile::new("app/main.js", "");
        assert_eq!(
            slow_message(&plugin, "compile", &file),
            "failing is taking too long to compile @ app/main.js"
        );
        assert_eq!(plugin.convention(), CallingConvention::Direct);
    }

    #[tokio::test]
    async fn synchronous_failure_is_returned_verbatim() {
        let invoker = PluginInvoker::default();
        let err = invoker
            .invoke(&Plugin::direct(Failing), "compile", &PipelineFile::new("a.js", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Plugin(_)));
        assert_eq!(err.to_string(), "syntax error");
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let invoker = PluginInvoker::default();
        let err = invoker
            .invoke(&Plugin::direct(Failing), "optimize", &PipelineFile::new("a.js", "x"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failing has no `optimize` hook");
    }
}
