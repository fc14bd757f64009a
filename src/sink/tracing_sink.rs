//! Sink backed by the `tracing` facade.
//!
//! # Responsibilities
//! - Emit one `tracing` event per log call, at the mapped severity
//! - Apply per-logger thresholds before the subscriber's own filter
//! - Swap thresholds atomically when configuration is reloaded
//!
//! # Design Decisions
//! - Events use the fixed target `loggable`; the logger identity travels in
//!   the `logger` field since `tracing` targets must be static
//! - A cause is rendered as the `error` field with its full source chain

use std::error::Error;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::Level;

use crate::config::schema::LevelsConfig;
use crate::sink::{ErrorChain, LogLevel, LogSink};

/// Target attached to every event emitted by [`TracingSink`].
pub const EVENT_TARGET: &str = "loggable";

/// Forwards log calls to the current `tracing` subscriber.
pub struct TracingSink {
    levels: ArcSwap<LevelsConfig>,
}

impl TracingSink {
    pub fn new(levels: LevelsConfig) -> Self {
        Self {
            levels: ArcSwap::from_pointee(levels),
        }
    }

    /// Replace the per-logger thresholds.
    pub fn reload(&self, levels: LevelsConfig) {
        tracing::info!(
            root = %levels.root,
            loggers = levels.loggers.len(),
            "Logger levels reloaded"
        );
        self.levels.store(Arc::new(levels));
    }

    pub fn levels(&self) -> Arc<LevelsConfig> {
        self.levels.load_full()
    }

    fn permits(&self, level: LogLevel, target: &str) -> bool {
        self.levels.load().threshold_for(target).permits(level)
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(LevelsConfig::default())
    }
}

fn subscriber_enabled(level: Level) -> bool {
    match level {
        Level::TRACE => tracing::enabled!(target: EVENT_TARGET, Level::TRACE),
        Level::DEBUG => tracing::enabled!(target: EVENT_TARGET, Level::DEBUG),
        Level::INFO => tracing::enabled!(target: EVENT_TARGET, Level::INFO),
        Level::WARN => tracing::enabled!(target: EVENT_TARGET, Level::WARN),
        Level::ERROR => tracing::enabled!(target: EVENT_TARGET, Level::ERROR),
    }
}

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        let Some(severity) = level.severity() else {
            return;
        };
        if !self.permits(level, target) {
            return;
        }
        match severity {
            Level::TRACE => tracing::trace!(target: EVENT_TARGET, logger = %target, "{}", message),
            Level::DEBUG => tracing::debug!(target: EVENT_TARGET, logger = %target, "{}", message),
            Level::INFO => tracing::info!(target: EVENT_TARGET, logger = %target, "{}", message),
            Level::WARN => tracing::warn!(target: EVENT_TARGET, logger = %target, "{}", message),
            Level::ERROR => tracing::error!(target: EVENT_TARGET, logger = %target, "{}", message),
        }
    }

    fn log_with_cause(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        cause: &(dyn Error + 'static),
    ) {
        let Some(severity) = level.severity() else {
            return;
        };
        if !self.permits(level, target) {
            return;
        }
        let chain = ErrorChain(cause);
        match severity {
            Level::TRACE => {
                tracing::trace!(target: EVENT_TARGET, logger = %target, error = %chain, "{}", message)
            }
            Level::DEBUG => {
                tracing::debug!(target: EVENT_TARGET, logger = %target, error = %chain, "{}", message)
            }
            Level::INFO => {
                tracing::info!(target: EVENT_TARGET, logger = %target, error = %chain, "{}", message)
            }
            Level::WARN => {
                tracing::warn!(target: EVENT_TARGET, logger = %target, error = %chain, "{}", message)
            }
            Level::ERROR => {
                tracing::error!(target: EVENT_TARGET, logger = %target, error = %chain, "{}", message)
            }
        }
    }

    fn is_enabled(&self, level: LogLevel, target: &str) -> bool {
        let Some(severity) = level.severity() else {
            return false;
        };
        self.permits(level, target) && subscriber_enabled(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture<F: FnOnce()>(max: Level, f: F) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(max)
            .with_ansi(false)
            .with_writer(buffer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[test]
    fn test_emits_message_with_logger_field() {
        let sink = TracingSink::default();
        let output = capture(Level::TRACE, || {
            sink.log(LogLevel::Trace, "logger name", "trace message");
        });
        assert!(output.contains("TRACE"));
        assert!(output.contains("trace message"));
        assert!(output.contains("logger=logger name"));
    }

    #[test]
    fn test_emits_cause_chain() {
        let sink = TracingSink::default();
        let err = io::Error::new(io::ErrorKind::Other, "error message");
        let output = capture(Level::TRACE, || {
            sink.log_with_cause(LogLevel::Warn, "logger name", "warn message", &err);
        });
        assert!(output.contains("WARN"));
        assert!(output.contains("warn message"));
        assert!(output.contains("error=error message"));
    }

    #[test]
    fn test_fatal_is_written_as_error() {
        let sink = TracingSink::default();
        let output = capture(Level::TRACE, || {
            sink.log(LogLevel::Fatal, "logger name", "fatal message");
        });
        assert!(output.contains("ERROR"));
        assert!(output.contains("fatal message"));
    }

    #[test]
    fn test_off_writes_nothing() {
        let sink = TracingSink::default();
        let output = capture(Level::TRACE, || {
            sink.log(LogLevel::Off, "logger name", "off message");
            assert!(!sink.is_enabled(LogLevel::Off, "logger name"));
        });
        assert!(!output.contains("off message"));
    }

    #[test]
    fn test_logger_thresholds_and_reload() {
        let mut levels = LevelsConfig::default();
        levels.loggers.insert("app::billing".into(), LogLevel::Error);
        let sink = TracingSink::new(levels);

        tracing::subscriber::with_default(
            tracing_subscriber::fmt().with_max_level(Level::TRACE).finish(),
            || {
                assert!(!sink.is_enabled(LogLevel::Warn, "app::billing::Invoices"));
                assert!(sink.is_enabled(LogLevel::Error, "app::billing::Invoices"));
                assert!(sink.is_enabled(LogLevel::Debug, "app::shipping"));

                sink.reload(LevelsConfig::default());
                assert!(sink.is_enabled(LogLevel::Warn, "app::billing::Invoices"));
            },
        );
    }

    #[test]
    fn test_log_respects_reloaded_thresholds() {
        let sink = TracingSink::default();
        let mut levels = LevelsConfig::default();
        levels.loggers.insert("app".into(), LogLevel::Error);

        let output = capture(Level::TRACE, || {
            sink.log(LogLevel::Warn, "app::Inventory", "before reload");
            sink.reload(levels);
            sink.log(LogLevel::Warn, "app::Inventory", "after reload");
            let err = io::Error::new(io::ErrorKind::Other, "disk");
            sink.log_with_cause(LogLevel::Info, "app::Inventory", "quiet cause", &err);
            sink.log(LogLevel::Error, "app::Inventory", "still loud");
        });
        assert!(output.contains("before reload"));
        assert!(!output.contains("after reload"));
        assert!(!output.contains("quiet cause"));
        assert!(output.contains("still loud"));
    }

    #[test]
    fn test_is_enabled_is_stable() {
        let sink = TracingSink::default();
        tracing::subscriber::with_default(
            tracing_subscriber::fmt().with_max_level(Level::INFO).finish(),
            || {
                let first = sink.is_enabled(LogLevel::Debug, "app");
                for _ in 0..10 {
                    assert_eq!(sink.is_enabled(LogLevel::Debug, "app"), first);
                }
                assert!(sink.is_enabled(LogLevel::Info, "app"));
            },
        );
    }
}
