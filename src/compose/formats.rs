//! Overridable message templates.

use serde::{Deserialize, Serialize};

/// Templates for the five lifecycle events.
///
/// Any template left out of a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerFormats {
    pub enter: String,
    pub warn_before: String,
    pub warn_after: String,
    pub after: String,
    pub error: String,
}

impl LoggerFormats {
    /// Templates paired with their config key.
    pub fn named(&self) -> [(&'static str, &str); 5] {
        [
            ("enter", self.enter.as_str()),
            ("warn_before", self.warn_before.as_str()),
            ("warn_after", self.warn_after.as_str()),
            ("after", self.after.as_str()),
            ("error", self.error.as_str()),
        ]
    }
}

impl Default for LoggerFormats {
    fn default() -> Self {
        Self {
            enter: "#${method.name}(${method.args}): entered".to_string(),
            warn_before: "#${method.name}(${method.args}): \
                in ${method.duration} and still running (max ${method.warn.duration})"
                .to_string(),
            warn_after: "#${method.name}(${method.args}): \
                ${method.result} in ${method.duration} (max ${method.warn.duration})"
                .to_string(),
            after: "#${method.name}(${method.args}): ${method.result} in ${method.duration}"
                .to_string(),
            error: "#${method.name}(${method.args}): \
                thrown ${error.class.name}(${error.message}) \
                from ${error.source.class.name}[${error.source.line}] in ${method.duration}"
                .to_string(),
        }
    }
}
