//! Method-level execution logging.
//!
//! Wraps calls so that each one logs its arguments, result or failure and
//! elapsed time, and warns about calls that run past a threshold, both while
//! they are still running and when they finish.
//!
//! ```
//! use std::sync::Arc;
//! use loggable::{args, Interceptor, JoinPoint, Loggable, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let interceptor = Interceptor::builder().sink(sink.clone()).build().unwrap();
//!
//! let site = JoinPoint::new("app::Inventory", "restock");
//! let total = interceptor.invoke(&site, &Loggable::new(), args![3], || 3 + 4);
//!
//! assert_eq!(total, 7);
//! assert!(sink.output().starts_with("INFO app::Inventory - #restock([3]): 7 in PT"));
//! ```

// Formatting
pub mod compose;
pub mod format;

// Interception
pub mod intercept;
pub mod watchdog;

// Cross-cutting concerns
pub mod config;
pub mod observability;
pub mod sink;

pub use compose::{ComposerKind, LoggerFormats, MessageComposer};
pub use config::LoggerConfig;
pub use format::{ToValue, Value};
pub use intercept::{
    Failure, IgnoredFailure, Interceptor, JoinPoint, Located, Loggable, Registry, Visibility,
};
pub use sink::{LogLevel, LogSink, MemorySink, TracingSink};
