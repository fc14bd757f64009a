//! In-memory sink that keeps every emitted entry.

use std::error::Error;
use std::sync::Mutex;

use crate::config::schema::LevelsConfig;
use crate::sink::{ErrorChain, LogLevel, LogSink};

/// One recorded log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    /// Rendered cause chain, present only for entries logged with a cause.
    pub cause: Option<String>,
}

impl LogEntry {
    /// `LEVEL target - message`, the shape of a classic logger line.
    pub fn line(&self) -> String {
        format!(
            "{} {} - {}",
            self.level.as_str().to_ascii_uppercase(),
            self.target,
            self.message
        )
    }
}

/// A sink that records entries instead of writing them anywhere.
#[derive(Debug, Default)]
pub struct MemorySink {
    levels: LevelsConfig,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Record everything from `trace` up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record only what `levels` lets through.
    pub fn with_levels(levels: LevelsConfig) -> Self {
        Self {
            levels,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Every entry rendered with [`LogEntry::line`], newline separated.
    pub fn output(&self) -> String {
        self.lock()
            .iter()
            .map(LogEntry::line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Entries recorded at `level` whose message contains `fragment`.
    pub fn find(&self, level: LogLevel, fragment: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.level == level.normalized() && e.message.contains(fragment))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // A panicking writer leaves the Vec intact; keep recording.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, level: LogLevel, target: &str, message: &str, cause: Option<String>) {
        if level.severity().is_none() || !self.is_enabled(level, target) {
            return;
        }
        self.lock().push(LogEntry {
            level: level.normalized(),
            target: target.to_string(),
            message: message.to_string(),
            cause,
        });
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        self.record(level, target, message, None);
    }

    fn log_with_cause(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        cause: &(dyn Error + 'static),
    ) {
        self.record(level, target, message, Some(ErrorChain(cause).to_string()));
    }

    fn is_enabled(&self, level: LogLevel, target: &str) -> bool {
        self.levels.threshold_for(target).permits(level)
    }
}
