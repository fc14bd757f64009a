//! Log severity levels.
//!
//! Ordering from most to least verbose: trace, debug, info, warn, error.
//! `Fatal` is accepted as an alias of `Error` and `Off` is never enabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity attached to a monitored call or a single log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

/// Raised when a level name is not one of the recognized levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("unknown log level `{0}`")]
    Unknown(String),
}

impl LogLevel {
    /// Map onto the `tracing` severity this level is emitted at.
    ///
    /// This is the single place where `Fatal` folds into `Error` and `Off`
    /// disables emission entirely.
    pub fn severity(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Trace => Some(tracing::Level::TRACE),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error | LogLevel::Fatal => Some(tracing::Level::ERROR),
            LogLevel::Off => None,
        }
    }

    /// The level entries are recorded under (`Fatal` becomes `Error`).
    pub fn normalized(self) -> Self {
        match self {
            LogLevel::Fatal => LogLevel::Error,
            other => other,
        }
    }

    fn rank(self) -> Option<u8> {
        match self.normalized() {
            LogLevel::Trace => Some(0),
            LogLevel::Debug => Some(1),
            LogLevel::Info => Some(2),
            LogLevel::Warn => Some(3),
            LogLevel::Error => Some(4),
            LogLevel::Fatal | LogLevel::Off => None,
        }
    }

    /// Treating `self` as a threshold, is an entry at `level` let through?
    pub fn permits(self, level: LogLevel) -> bool {
        match (level.rank(), self.rank()) {
            (Some(entry), Some(threshold)) => entry >= threshold,
            _ => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Off => "off",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "off" => Ok(LogLevel::Off),
            _ => Err(LevelError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LevelError;

    fn try_from(value: String) -> Result<Self, LevelError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("fatal".parse::<LogLevel>().unwrap(), LogLevel::Fatal);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::Off);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err, LevelError::Unknown("verbose".into()));
        assert_eq!(err.to_string(), "unknown log level `verbose`");
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(LogLevel::try_from("error".to_string()), Ok(LogLevel::Error));
        assert_eq!(
            LogLevel::try_from("loud".to_string()),
            Err(LevelError::Unknown("loud".into()))
        );
    }

    #[test]
    fn test_fatal_folds_into_error() {
        assert_eq!(LogLevel::Fatal.severity(), Some(tracing::Level::ERROR));
        assert_eq!(LogLevel::Fatal.normalized(), LogLevel::Error);
        assert!(LogLevel::Error.permits(LogLevel::Fatal));
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(LogLevel::Info.permits(LogLevel::Warn));
        assert!(LogLevel::Info.permits(LogLevel::Info));
        assert!(!LogLevel::Info.permits(LogLevel::Debug));
        assert!(!LogLevel::Error.permits(LogLevel::Warn));
        assert!(LogLevel::Trace.permits(LogLevel::Trace));
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert_eq!(LogLevel::Off.severity(), None);
        assert!(!LogLevel::Off.permits(LogLevel::Error));
        assert!(!LogLevel::Trace.permits(LogLevel::Off));
    }
}
