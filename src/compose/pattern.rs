//! Fixed patterns with positional arguments.

use std::time::Duration;

use crate::compose::{Call, FailureDetails, MessageComposer};
use crate::format::{iso8601, Value};

/// Composer with the default message shapes baked in.
///
/// Produces the same text as [`TemplateComposer`](super::TemplateComposer)
/// over the default formats, without parsing templates per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternComposer;

impl MessageComposer for PatternComposer {
    fn enter(&self, call: &Call<'_>) -> String {
        format!("#{}({}): entered", call.method, call.args_text())
    }

    fn warn_before(&self, call: &Call<'_>, elapsed: Duration) -> String {
        format!(
            "#{}({}): in {} and still running (max {})",
            call.method,
            call.args_text(),
            iso8601(elapsed),
            call.warn_text()
        )
    }

    fn warn_after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String {
        format!(
            "#{}({}): {} in {} (max {})",
            call.method,
            call.args_text(),
            call.result_text(result),
            iso8601(elapsed),
            call.warn_text()
        )
    }

    fn after(&self, call: &Call<'_>, result: &Value, elapsed: Duration) -> String {
        format!(
            "#{}({}): {} in {}",
            call.method,
            call.args_text(),
            call.result_text(result),
            iso8601(elapsed)
        )
    }

    fn error(&self, call: &Call<'_>, failure: &FailureDetails, elapsed: Duration) -> String {
        format!(
            "#{}({}): thrown {}({}) from {}[{}] in {}",
            call.method,
            call.args_text(),
            failure.class_name,
            failure.message,
            failure.source_class,
            failure.source_line,
            iso8601(elapsed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::compose::TemplateComposer;
    use crate::intercept::Loggable;

    #[test]
    fn test_matches_default_templates() {
        let template = TemplateComposer::default();
        let pattern = PatternComposer;

        let declarations = [
            Loggable::default(),
            Loggable {
                skip_args: true,
                skip_result: true,
                warn_over: Some(Duration::from_millis(2)),
                ..Loggable::default()
            },
        ];
        let args = args![[1.5f64, 2.0], "x", None::<u8>];
        let failure = FailureDetails {
            class_name: "panic".into(),
            message: "boom".into(),
            source_class: "somewhere".into(),
            source_line: -1,
        };
        let elapsed = Duration::from_millis(1234);

        for declaration in &declarations {
            let call = Call {
                method: "withParams",
                args: &args,
                declaration,
            };
            assert_eq!(pattern.enter(&call), template.enter(&call));
            assert_eq!(
                pattern.warn_before(&call, elapsed),
                template.warn_before(&call, elapsed)
            );
            assert_eq!(
                pattern.warn_after(&call, &Value::Bool(true), elapsed),
                template.warn_after(&call, &Value::Bool(true), elapsed)
            );
            assert_eq!(
                pattern.after(&call, &Value::Null, elapsed),
                template.after(&call, &Value::Null, elapsed)
            );
            assert_eq!(
                pattern.error(&call, &failure, elapsed),
                template.error(&call, &failure, elapsed)
            );
        }
    }

    #[test]
    fn test_skipped_args_render_as_dots() {
        let declaration = Loggable {
            skip_args: true,
            skip_result: true,
            warn_over: Some(Duration::from_millis(2)),
            ..Loggable::default()
        };
        let args = args!["secret", 7];
        let call = Call {
            method: "f",
            args: &args,
            declaration: &declaration,
        };
        let failure = FailureDetails {
            class_name: "panic".into(),
            message: "boom".into(),
            source_class: "somewhere".into(),
            source_line: -1,
        };
        let elapsed = Duration::from_millis(5);

        let messages = [
            PatternComposer.enter(&call),
            PatternComposer.warn_before(&call, elapsed),
            PatternComposer.warn_after(&call, &Value::Int(1), elapsed),
            PatternComposer.after(&call, &Value::Int(1), elapsed),
            PatternComposer.error(&call, &failure, elapsed),
        ];
        for message in &messages {
            assert!(message.starts_with("#f(..): "), "{message}");
            assert!(!message.contains("secret"), "{message}");
        }
        assert_eq!(messages[3], "#f(..): .. in PT0.005S");
    }
}
