//! Method-level call interception.
//!
//! # Responsibilities
//! - Decide which calls are monitored (selection.rs)
//! - Drive a monitored call through its logging lifecycle (interceptor.rs)
//! - Classify failures and the ones logged without cause (failure.rs)
//!
//! # Data Flow
//! ```text
//! caller
//!     → Registry::resolve (optional; or a Loggable held by the caller)
//!     → Interceptor::invoke / try_invoke / *_async
//!         → register with the watchdog (warn enabled and threshold set)
//!         → enter message (if `entered`)
//!         → wrapped call
//!         → after / warn_after / error message
//!         → deregister
//!     → original result, error or panic
//! ```
//!
//! # Design Decisions
//! - Explicit wrapper calls instead of implicit proxies
//! - The logger identity is the declaration's name, else the declaring type
//! - Completion compares elapsed milliseconds, strictly greater than the threshold

pub mod declaration;
pub mod failure;
pub mod interceptor;
pub mod join_point;
pub mod selection;

pub use declaration::Loggable;
pub use failure::{describe, Failure, IgnoredFailure, Located, Panic, UNKNOWN_LINE, UNKNOWN_SOURCE};
pub use interceptor::{Interceptor, InterceptorBuilder};
pub use join_point::JoinPoint;
pub use selection::{Registry, Visibility, STRUCTURAL_METHODS};
