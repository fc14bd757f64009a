//! Level-gated logging sink.
//!
//! # Data Flow
//! ```text
//! Interceptor / Watchdog
//!     → is_enabled(level, target)   (skip composing when disabled)
//!     → log(level, target, message)
//!     → log_with_cause(level, target, message, cause)
//!
//! Implementations:
//!     tracing_sink.rs (tracing events, per-logger thresholds, hot reload)
//!     memory.rs       (in-memory capture for assertions)
//! ```
//!
//! # Design Decisions
//! - Target identity is a plain string (explicit name or declaring type)
//! - `Off` is never enabled and emission at `Off` is a no-op
//! - Unknown level names are rejected when parsed, never at emission time

pub mod level;
pub mod memory;
pub mod tracing_sink;

use std::error::Error;
use std::fmt;

pub use level::{LevelError, LogLevel};
pub use memory::{LogEntry, MemorySink};
pub use tracing_sink::TracingSink;

/// Leveled log emission keyed by a target identity.
pub trait LogSink: Send + Sync {
    /// Emit `message` at `level` for `target`.
    fn log(&self, level: LogLevel, target: &str, message: &str);

    /// Emit `message` together with the full cause chain of `cause`.
    fn log_with_cause(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        cause: &(dyn Error + 'static),
    );

    /// Would an entry at `level` for `target` be recorded?
    fn is_enabled(&self, level: LogLevel, target: &str) -> bool;
}

/// Renders an error followed by each of its sources.
pub struct ErrorChain<'a>(pub &'a (dyn Error + 'static));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug)]
    struct Outer(io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("loading inventory failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_renders_sources() {
        let err = Outer(io::Error::new(io::ErrorKind::NotFound, "stock.csv missing"));
        assert_eq!(
            ErrorChain(&err).to_string(),
            "loading inventory failed: stock.csv missing"
        );
    }
}
