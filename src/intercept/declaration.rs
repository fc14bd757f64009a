//! Monitoring declarations.

use std::error::Error;
use std::time::Duration;

use crate::intercept::failure::IgnoredFailure;
use crate::intercept::join_point::JoinPoint;
use crate::sink::LogLevel;

/// How a monitored call is logged.
///
/// Once attached to a call site a declaration is shared read-only; nothing
/// changes it while a call is in flight.
#[derive(Debug, Clone, Default)]
pub struct Loggable {
    /// Severity of successful completion.
    pub level: LogLevel,

    /// Logger name; the declaring type is used when absent.
    pub name: Option<String>,

    /// Log before the call proceeds.
    pub entered: bool,

    /// Replace arguments with `..`.
    pub skip_args: bool,

    /// Replace the result with `..`.
    pub skip_result: bool,

    /// Failures logged without their cause chain.
    pub ignore: Vec<IgnoredFailure>,

    /// Calls running longer than this are warned about.
    pub warn_over: Option<Duration>,
}

impl Loggable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declaration logging successful calls at `level`.
    pub fn at(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set the threshold from a signed millisecond count; negative disables it.
    pub fn warn_over_millis(mut self, millis: i64) -> Self {
        self.warn_over = u64::try_from(millis).ok().map(Duration::from_millis);
        self
    }

    /// Logger identity for a call at `join_point`.
    pub fn target<'a>(&'a self, join_point: &'a JoinPoint) -> &'a str {
        self.name.as_deref().unwrap_or(join_point.declaring_type())
    }

    /// Has `elapsed` passed the threshold? Compared at millisecond resolution.
    pub fn is_over(&self, elapsed: Duration) -> bool {
        self.warn_over
            .is_some_and(|threshold| elapsed.as_millis() > threshold.as_millis())
    }

    /// Should `err` be logged without its cause chain?
    pub fn ignores(&self, err: &(dyn Error + 'static)) -> bool {
        self.ignore.iter().any(|ignored| ignored.matches(err))
    }
}
