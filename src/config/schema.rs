//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compose::{ComposerKind, LoggerFormats};
use crate::intercept::Loggable;
use crate::sink::LogLevel;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggerConfig {
    /// Message templates for the five lifecycle events.
    pub formats: LoggerFormats,

    /// Which message composer renders the templates.
    pub composer: ComposerKind,

    /// Slow-call watchdog settings.
    pub watchdog: WatchdogConfig,

    /// Per-logger severity thresholds.
    pub levels: LevelsConfig,

    /// Subscriber settings for the binary.
    pub observability: ObservabilityConfig,

    /// Monitoring declarations attached by configuration.
    pub declarations: Vec<DeclarationConfig>,
}

/// Watchdog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Scan period in milliseconds.
    pub period_ms: u64,
}

impl WatchdogConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { period_ms: 1000 }
    }
}

/// Severity thresholds keyed by logger identity.
///
/// A logger inherits the threshold of its longest configured `::` prefix,
/// falling back to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelsConfig {
    /// Threshold for loggers with no more specific entry.
    pub root: LogLevel,

    /// Thresholds for specific loggers (e.g. `"app::billing" = "error"`).
    pub loggers: BTreeMap<String, LogLevel>,
}

impl LevelsConfig {
    /// Resolve the threshold that applies to `target`.
    pub fn threshold_for(&self, target: &str) -> LogLevel {
        self.loggers
            .iter()
            .filter(|(prefix, _)| {
                target == prefix.as_str()
                    || target
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
            .unwrap_or(self.root)
    }
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            root: LogLevel::Trace,
            loggers: BTreeMap::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Subscriber filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A monitoring declaration for a type, or for one method of a type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeclarationConfig {
    /// Declaring type identity (e.g. `"app::billing::Invoices"`).
    pub target: String,

    /// Method name; absent for a type-level declaration.
    #[serde(default)]
    pub method: Option<String>,

    /// Severity of successful completion.
    #[serde(default)]
    pub level: LogLevel,

    /// Explicit logger name.
    #[serde(default)]
    pub name: Option<String>,

    /// Log before the call proceeds.
    #[serde(default)]
    pub entered: bool,

    #[serde(default)]
    pub skip_args: bool,

    #[serde(default)]
    pub skip_result: bool,

    /// Slow-call threshold in milliseconds; negative disables it.
    #[serde(default = "default_warn_over_ms")]
    pub warn_over_ms: i64,
}

fn default_warn_over_ms() -> i64 {
    -1
}

impl DeclarationConfig {
    pub fn to_loggable(&self) -> Loggable {
        Loggable {
            level: self.level,
            name: self.name.clone(),
            entered: self.entered,
            skip_args: self.skip_args,
            skip_result: self.skip_result,
            ignore: Vec::new(),
            warn_over: u64::try_from(self.warn_over_ms)
                .ok()
                .map(Duration::from_millis),
        }
    }
}
