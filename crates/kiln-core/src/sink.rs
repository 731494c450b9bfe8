//! Line-oriented logging sink used by the watchdog and the progress ticker.

use std::sync::Arc;

use parking_lot::Mutex;

/// Severity of a line written to a [`LogSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
}

/// Destination for warning and info lines.
pub trait LogSink: Send + Sync {
    fn warn(&self, line: &str);
    fn info(&self, line: &str);
}

/// Default sink: forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn warn(&self, line: &str) {
        tracing::warn!("{}", line);
    }

    fn info(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Sink that keeps every line in memory, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.with_severity(Severity::Warn)
    }

    pub fn infos(&self) -> Vec<String> {
        self.with_severity(Severity::Info)
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn warn(&self, line: &str) {
        self.lines.lock().push((Severity::Warn, line.to_string()));
    }

    fn info(&self, line: &str) {
        self.lines.lock().push((Severity::Info, line.to_string()));
    }
}
