//! Placeholder substitution over [`LoggerFormats`].

use std::time::Duration;

use crate::compose::context::*;
use crate::compose::{Call, FailureDetails, LoggerFormats, MessageComposer};
use crate::format::{iso8601, Value};

/// Replace every `${key}` in `template` with its value from `context`.
///
/// Keys the context does not hold are left as written, and `$${key}`
/// escapes to a literal `${key}`.
pub fn substitute(template: &str, context: &MessageContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        if start > 0 && rest.as_bytes()[start - 1] == b'$' {
            out.push_str(&rest[..start - 1]);
            out.push_str("${");
            rest = &rest[start + 2..];
            continue;
        }
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match context.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder keys referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let escaped = start > 0 && rest.as_bytes()[start - 1] == b'$';
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        if !escaped {
            keys.push(&after[..end]);
        }
        rest = &after[end + 1..];
    }
    keys
}

/// Composer driven by user-overridable templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateComposer {
    formats: LoggerFormats,
}

impl TemplateComposer {
    pub fn new(formats: LoggerFormats) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &LoggerFormats {
        &self.formats
    }

    fn base(call: &Call<'_>) -> MessageContext {
        MessageContext::new()
            .with(METHOD, call.method)
            .with(ARGS, call.args_text())
    }
}

impl MessageComposer for TemplateComposer {
    fn enter(&self, call: &Call<'_>) -> String {
        substitute(&self.formats.enter, &Self::base(call))
    }

    fn warn_before(&self, call: &Call<'_>, elapsed: Duration) -> String {
        let context = Self::base(call)
            .with(DURATION, iso8601(elapsed))
            .with(WARN_DURATION, call.warn_text());
        substitute(&self.formats.warn_before, &context)
    }

    fn warn_after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String {
        let context = Self::base(call)
            .with(DURATION, iso8601(elapsed))
            .with(WARN_DURATION, call.warn_text())
            .with(RESULT, call.result_text(result));
        substitute(&self.formats.warn_after, &context)
    }

    fn after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String {
        let context = Self::base(call)
            .with(DURATION, iso8601(elapsed))
            .with(RESULT, call.result_text(result));
        substitute(&self.formats.after, &context)
    }

    fn error(&self, call: &Call<'_>, failure: &FailureDetails, elapsed: Duration) -> String {
        let context = Self::base(call)
            .with(DURATION, iso8601(elapsed))
            .with(ERROR_CLASS, failure.class_name.as_str())
            .with(ERROR_MESSAGE, failure.message.as_str())
            .with(ERROR_SOURCE_CLASS, failure.source_class.as_str())
            .with(ERROR_LINE, failure.source_line.to_string());
        substitute(&self.formats.error, &context)
    }
}
