//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor / Watchdog / config reloads produce:
//!     → logging.rs (tracing subscriber for the binary)
//!     → metrics.rs (counters, histogram)
//! ```
//!
//! # Design Decisions
//! - Monitored-call messages go through a `LogSink`; this module only
//!   covers the crate's own diagnostics and the host subscriber
//! - Metrics are cheap (facade calls, no-ops without a recorder)

pub mod logging;
pub mod metrics;
