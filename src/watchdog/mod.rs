//! Still-running call detection.
//!
//! # Responsibilities
//! - Track in-flight calls that carry a slow-call threshold
//! - Warn once about each call still running past its threshold
//! - Stop as soon as the owning interceptor is dropped
//!
//! # Data Flow
//! ```text
//! Interceptor::invoke
//!     → Watchdog::register (only when warn is enabled and a threshold is set)
//!     → pending.rs (DashMap<CallId, WarnPoint>)
//!
//! watchdog thread, every period:
//!     → PendingCalls::take_overdue (removal decides who warns)
//!     → MessageComposer::warn_before → LogSink at WARN
//!
//! call completes → Registration dropped → record removed if still present
//! ```
//!
//! # Design Decisions
//! - One plain OS thread; scanning never blocks a monitored call
//! - Dropping the watchdog closes its stop channel, waking the thread
//!   mid-period; the drop joins it

pub mod pending;

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::compose::{Call, MessageComposer};
use crate::format::Value;
use crate::intercept::{JoinPoint, Loggable};
use crate::observability::metrics;
use crate::sink::{LogLevel, LogSink};

pub use pending::{CallId, PendingCalls, WarnPoint};

/// Default interval between scans.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

struct Shared {
    pending: PendingCalls,
    sink: Arc<dyn LogSink>,
    composer: Arc<dyn MessageComposer>,
}

impl Shared {
    fn scan(&self, now: Instant) -> usize {
        let overdue = self.pending.take_overdue(now);
        for point in &overdue {
            self.warn(point, now);
        }
        overdue.len()
    }

    fn warn(&self, point: &WarnPoint, now: Instant) {
        let target = point.declaration.target(&point.join_point);
        if !self.sink.is_enabled(LogLevel::Warn, target) {
            return;
        }
        let call = Call {
            method: point.join_point.method(),
            args: &point.args,
            declaration: &point.declaration,
        };
        let message = self.composer.warn_before(&call, point.elapsed(now));
        self.sink.log(LogLevel::Warn, target, &message);
        metrics::record_still_running();
    }
}

/// Background scanner over the calls registered with it.
pub struct Watchdog {
    shared: Arc<Shared>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Watchdog {
    /// Spawn the scanning thread.
    pub fn start(
        sink: Arc<dyn LogSink>,
        composer: Arc<dyn MessageComposer>,
        period: Duration,
    ) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            pending: PendingCalls::new(),
            sink,
            composer,
        });

        let (stop, stopped) = mpsc::channel();
        let scanned = shared.clone();
        let worker = thread::Builder::new()
            .name("loggable-watchdog".to_string())
            .spawn(move || run(scanned, stopped, period))?;

        tracing::debug!(period_ms = period.as_millis() as u64, "Watchdog started");
        Ok(Self {
            shared,
            stop: Some(stop),
            worker: Some(worker),
        })
    }

    /// Track a call until the returned guard is dropped.
    pub fn register(
        &self,
        join_point: &JoinPoint,
        declaration: &Loggable,
        args: &[Value],
        start: Instant,
    ) -> Registration<'_> {
        let id = self.shared.pending.insert(WarnPoint {
            join_point: join_point.clone(),
            declaration: declaration.clone(),
            args: args.to_vec(),
            start,
        });
        Registration {
            pending: &self.shared.pending,
            id,
        }
    }

    /// Number of calls currently tracked.
    pub fn pending(&self) -> usize {
        self.shared.pending.len()
    }

    /// Warn about overdue calls now; returns how many were warned about.
    pub fn scan(&self) -> usize {
        self.shared.scan(Instant::now())
    }
}

impl std::fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchdog")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

fn run(shared: Arc<Shared>, stopped: mpsc::Receiver<()>, period: Duration) {
    loop {
        match stopped.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        let warned = shared.scan(Instant::now());
        if warned > 0 {
            tracing::trace!(warned, "Watchdog scan");
        }
    }
    tracing::debug!("Watchdog stopped");
}

/// Keeps a call registered; deregisters on drop.
#[derive(Debug)]
pub struct Registration<'a> {
    pending: &'a PendingCalls,
    id: CallId,
}

impl Registration<'_> {
    pub fn id(&self) -> CallId {
        self.id
    }

    /// False once the watchdog has warned about this call.
    pub fn is_pending(&self) -> bool {
        self.pending.contains(self.id)
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.pending.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::compose::TemplateComposer;
    use crate::sink::MemorySink;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn watchdog(period: Duration) -> (Watchdog, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let watchdog = Watchdog::start(
            sink.clone(),
            Arc::new(TemplateComposer::default()),
            period,
        )
        .unwrap();
        (watchdog, sink)
    }

    #[test]
    fn test_scan_warns_once() {
        let (watchdog, sink) = watchdog(Duration::from_secs(3600));
        let join_point = JoinPoint::new("app::Inventory", "restock");
        let declaration = Loggable::new().warn_over_millis(1);

        let registration = watchdog.register(
            &join_point,
            &declaration,
            &args!["str", 10],
            Instant::now() - Duration::from_millis(20),
        );
        assert!(registration.is_pending());

        assert_eq!(watchdog.scan(), 1);
        assert_eq!(watchdog.scan(), 0);
        assert!(!registration.is_pending());

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].target, "app::Inventory");
        assert!(entries[0]
            .message
            .starts_with("#restock(['str', 10]): in PT0.0"));
        assert!(entries[0].message.ends_with("and still running (max PT0.001S)"));
    }

    #[test]
    fn test_drop_deregisters() {
        let (watchdog, sink) = watchdog(Duration::from_secs(3600));
        let join_point = JoinPoint::new("app::Inventory", "restock");
        let declaration = Loggable::new().warn_over_millis(1);

        let registration = watchdog.register(
            &join_point,
            &declaration,
            &[],
            Instant::now() - Duration::from_millis(20),
        );
        assert_eq!(watchdog.pending(), 1);
        drop(registration);
        assert_eq!(watchdog.pending(), 0);
        assert_eq!(watchdog.scan(), 0);
        assert!(sink.entries().is_empty());
    }

    /// Sink whose WARN switch can be flipped between register and scan.
    #[derive(Default)]
    struct Switchable {
        quiet: AtomicBool,
        logged: AtomicUsize,
    }

    impl LogSink for Switchable {
        fn log(&self, _: LogLevel, _: &str, _: &str) {
            self.logged.fetch_add(1, Ordering::SeqCst);
        }

        fn log_with_cause(
            &self,
            _: LogLevel,
            _: &str,
            _: &str,
            _: &(dyn std::error::Error + 'static),
        ) {
            self.logged.fetch_add(1, Ordering::SeqCst);
        }

        fn is_enabled(&self, _: LogLevel, _: &str) -> bool {
            !self.quiet.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_no_warning_once_warn_disabled() {
        let sink = Arc::new(Switchable::default());
        let watchdog = Watchdog::start(
            sink.clone(),
            Arc::new(TemplateComposer::default()),
            Duration::from_secs(3600),
        )
        .unwrap();

        let registration = watchdog.register(
            &JoinPoint::new("app::Inventory", "restock"),
            &Loggable::new().warn_over_millis(1),
            &[],
            Instant::now() - Duration::from_millis(20),
        );
        sink.quiet.store(true, Ordering::SeqCst);

        assert_eq!(watchdog.scan(), 1);
        assert!(!registration.is_pending());
        assert_eq!(sink.logged.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_stops_thread_without_waiting_a_period() {
        let (watchdog, _sink) = watchdog(Duration::from_secs(3600));
        let started = Instant::now();
        drop(watchdog);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_background_thread_scans() {
        let (watchdog, sink) = watchdog(Duration::from_millis(5));
        let join_point = JoinPoint::new("app::Inventory", "restock");
        let declaration = Loggable::new().warn_over_millis(10);

        let registration = watchdog.register(&join_point, &declaration, &[], Instant::now());
        let deadline = Instant::now() + Duration::from_secs(5);
        while registration.is_pending() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        assert!(!registration.is_pending());
        assert_eq!(sink.find(LogLevel::Warn, "still running").len(), 1);
    }
}
