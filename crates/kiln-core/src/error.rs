//! Error types for plugin invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type plugins report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = InvokeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum InvokeError {
    /// The plugin failed, rejected, or completed its callback with an error.
    ///
    /// The plugin's own error is carried unchanged.
    #[error(transparent)]
    Plugin(BoxError),

    #[error("{plugin} has no `{method}` hook")]
    MissingHook { plugin: String, method: String },

    #[error("{plugin} dropped its completion callback for {method} @ {}", .path.display())]
    CallbackDropped {
        plugin: String,
        method: String,
        path: PathBuf,
    },
}

impl InvokeError {
    /// The plugin's original error, if this failure came from the plugin.
    pub fn plugin_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            InvokeError::Plugin(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn into_plugin_error(self) -> Option<BoxError> {
        match self {
            InvokeError::Plugin(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_error_is_transparent() {
        let err = InvokeError::Plugin("unexpected token at 3:14".into());
        assert_eq!(err.to_string(), "unexpected token at 3:14");
        assert_eq!(
            err.plugin_error().map(|e| e.to_string()).as_deref(),
            Some("unexpected token at 3:14")
        );
    }

    #[test]
    fn dropped_callback_names_plugin_and_file() {
        let err = InvokeError::CallbackDropped {
            plugin: "sass".to_string(),
            method: "compile".to_string(),
            path: PathBuf::from("app/styles/main.scss"),
        };
        assert_eq!(
            err.to_string(),
            "sass dropped its completion callback for compile @ app/styles/main.scss"
        );
        assert!(err.into_plugin_error().is_none());
    }
}
