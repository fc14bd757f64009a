//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use loggable::config::LevelsConfig;
use loggable::{Interceptor, LogLevel, LoggerFormats, MemorySink};
use tracing_subscriber::fmt::MakeWriter;

/// Interceptor whose watchdog never ticks on its own during a test.
pub fn interceptor(root: LogLevel) -> (Arc<Interceptor>, Arc<MemorySink>) {
    interceptor_with(root, LoggerFormats::default(), Duration::from_secs(3600))
}

/// Interceptor with custom formats and watchdog period.
pub fn interceptor_with(
    root: LogLevel,
    formats: LoggerFormats,
    period: Duration,
) -> (Arc<Interceptor>, Arc<MemorySink>) {
    let levels = LevelsConfig {
        root,
        ..LevelsConfig::default()
    };
    let sink = Arc::new(MemorySink::with_levels(levels));
    let interceptor = Interceptor::builder()
        .sink(sink.clone())
        .formats(formats)
        .watchdog_period(period)
        .build()
        .unwrap();
    (Arc::new(interceptor), sink)
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Writer capturing `tracing_subscriber::fmt` output.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
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
