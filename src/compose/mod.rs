//! Log message composition.
//!
//! # Data Flow
//! ```text
//! Interceptor / Watchdog event
//!     → Call (method, args, declaration) + event values
//!     → MessageContext (named values, built per event)
//!     → template.rs: substitute ${…} placeholders into LoggerFormats
//!       pattern.rs:  fixed patterns with positional arguments
//!     → message text handed to the sink
//! ```
//!
//! # Placeholders
//! - `${method.name}` - method name
//! - `${method.args}` - method arguments
//! - `${method.result}` - method result
//! - `${method.duration}` - elapsed time
//! - `${method.warn.duration}` - slow-call threshold
//! - `${error.class.name}` - failure type name
//! - `${error.message}` - failure message
//! - `${error.source.class.name}` - where the failure originated
//! - `${error.source.line}` - line the failure originated on

pub mod context;
pub mod formats;
pub mod pattern;
pub mod template;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::{format_args, format_value, iso8601, Value};
use crate::intercept::Loggable;

pub use context::{
    MessageContext, ARGS, DURATION, ERROR_CLASS, ERROR_LINE, ERROR_MESSAGE, ERROR_SOURCE_CLASS,
    METHOD, PLACEHOLDERS, RESULT, WARN_DURATION,
};
pub use formats::LoggerFormats;
pub use pattern::PatternComposer;
pub use template::{placeholders, substitute, TemplateComposer};

/// Replaces skipped arguments and results.
pub const DOTS: &str = "..";

/// The monitored call an event is about.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    pub method: &'a str,
    pub args: &'a [Value],
    pub declaration: &'a Loggable,
}

impl Call<'_> {
    /// Arguments as rendered in messages, or `..` when skipped.
    pub fn args_text(&self) -> String {
        if self.declaration.skip_args {
            DOTS.to_string()
        } else {
            format_args(self.args)
        }
    }

    /// A result as rendered in messages, or `..` when skipped.
    pub fn result_text(&self, result: &Value) -> String {
        if self.declaration.skip_result {
            DOTS.to_string()
        } else {
            format_value(result)
        }
    }

    /// The slow-call threshold as rendered in messages.
    pub fn warn_text(&self) -> String {
        iso8601(self.declaration.warn_over.unwrap_or_default())
    }
}

/// What a failure looks like in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub class_name: String,
    pub message: String,
    /// Source file the failure originated in, or `somewhere`.
    pub source_class: String,
    /// Line the failure originated on, or `-1`.
    pub source_line: i64,
}

/// Renders the message for each lifecycle event of a monitored call.
pub trait MessageComposer: Send + Sync {
    /// Before the call proceeds.
    fn enter(&self, call: &Call<'_>) -> String;

    /// Still running past its threshold (fired by the watchdog).
    fn warn_before(&self, call: &Call<'_>, elapsed: Duration) -> String;

    /// Completed, but slower than its threshold.
    fn warn_after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String;

    /// Completed normally.
    fn after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String;

    /// Failed.
    fn error(&self, call: &Call<'_>, failure: &FailureDetails, elapsed: Duration) -> String;
}

/// Selects the composer implementation from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposerKind {
    /// Placeholder substitution over [`LoggerFormats`].
    #[default]
    Template,
    /// Fixed default patterns; formats are ignored.
    Pattern,
}

impl ComposerKind {
    pub fn build(self, formats: LoggerFormats) -> Arc<dyn MessageComposer> {
        match self {
            ComposerKind::Template => Arc::new(TemplateComposer::new(formats)),
            ComposerKind::Pattern => Arc::new(PatternComposer),
        }
    }
}
