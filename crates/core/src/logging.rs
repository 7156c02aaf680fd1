//! Structured logging seam for the recovery layer.
//!
//! Every component takes a [`RecoveryLogger`] rather than reaching for a
//! process-wide sink. Production wiring uses [`TracingLogger`]; tests use
//! [`MemoryLogger`] to assert on what was reported, or [`NoopLogger`].

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

/// Severity of a recovery log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for recovery events: `(message, category, optional detail)`.
pub trait RecoveryLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, category: &str, detail: Option<&Value>);

    fn debug(&self, message: &str, category: &str, detail: Option<&Value>) {
        self.log(LogLevel::Debug, message, category, detail);
    }

    fn info(&self, message: &str, category: &str, detail: Option<&Value>) {
        self.log(LogLevel::Info, message, category, detail);
    }

    fn warn(&self, message: &str, category: &str, detail: Option<&Value>) {
        self.log(LogLevel::Warn, message, category, detail);
    }

    fn error(&self, message: &str, category: &str, detail: Option<&Value>) {
        self.log(LogLevel::Error, message, category, detail);
    }
}

/// Forwards recovery events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RecoveryLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, category: &str, detail: Option<&Value>) {
        let detail = detail.map(Value::to_string).unwrap_or_default();
        match level {
            LogLevel::Debug => tracing::debug!(category, detail = %detail, "{message}"),
            LogLevel::Info => tracing::info!(category, detail = %detail, "{message}"),
            LogLevel::Warn => tracing::warn!(category, detail = %detail, "{message}"),
            LogLevel::Error => tracing::error!(category, detail = %detail, "{message}"),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl RecoveryLogger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str, _category: &str, _detail: Option<&Value>) {}
}

/// A single recorded entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub category: String,
    pub detail: Option<Value>,
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Entries logged under `category`
    pub fn in_category(&self, category: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect()
    }

    /// Whether any entry at `level` contains `needle` in its message
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|entry| entry.level == level && entry.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl RecoveryLogger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str, category: &str, detail: Option<&Value>) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
            category: category.to_string(),
            detail: detail.cloned(),
        });
    }
}
