//! Argument and duration formatting.
//!
//! # Data Flow
//! ```text
//! call arguments / result
//!     → value.rs (ToValue: Rust values → Value)
//!     → args.rs  (Value → deterministic text)
//!
//! elapsed time / thresholds
//!     → duration.rs (ISO-8601, millisecond resolution)
//! ```
//!
//! # Design Decisions
//! - Formatting never fails; unrenderable arrays become `[unknown]`
//! - Strings are quoted so `'10'` and `10` stay distinguishable

pub mod args;
pub mod duration;
pub mod value;

pub use args::{format_args, format_value, NULL, UNKNOWN};
pub use duration::iso8601;
pub use value::{PrimitiveArray, ToValue, Value};
