//! Call metrics.
//!
//! # Metrics
//! - `loggable_calls_total` (counter): completed monitored calls by outcome
//! - `loggable_slow_calls_total` (counter): calls that finished over their threshold
//! - `loggable_still_running_total` (counter): still-running warnings emitted
//! - `loggable_call_duration_seconds` (histogram): monitored call latency
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs a recorder
//! - Without a recorder every update is a no-op

use std::time::Duration;

/// How a monitored call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    Panicked,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Succeeded => "succeeded",
            Outcome::Failed => "failed",
            Outcome::Panicked => "panicked",
        }
    }
}

/// Record a completed call.
pub fn record_call(outcome: Outcome, elapsed: Duration) {
    metrics::counter!("loggable_calls_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("loggable_call_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a call that completed over its threshold.
pub fn record_slow_call() {
    metrics::counter!("loggable_slow_calls_total").increment(1);
}

/// Record a still-running warning.
pub fn record_still_running() {
    metrics::counter!("loggable_still_running_total").increment(1);
}
