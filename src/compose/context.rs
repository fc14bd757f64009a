//! Named values available to message templates.

use std::collections::BTreeMap;

pub const METHOD: &str = "method.name";
pub const ARGS: &str = "method.args";
pub const RESULT: &str = "method.result";
pub const DURATION: &str = "method.duration";
pub const WARN_DURATION: &str = "method.warn.duration";
pub const ERROR_CLASS: &str = "error.class.name";
pub const ERROR_MESSAGE: &str = "error.message";
pub const ERROR_SOURCE_CLASS: &str = "error.source.class.name";
pub const ERROR_LINE: &str = "error.source.line";

/// Every placeholder some event can fill.
pub const PLACEHOLDERS: &[&str] = &[
    METHOD,
    ARGS,
    RESULT,
    DURATION,
    WARN_DURATION,
    ERROR_CLASS,
    ERROR_MESSAGE,
    ERROR_SOURCE_CLASS,
    ERROR_LINE,
];

/// Values for one event, discarded once the message is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContext {
    values: BTreeMap<&'static str, String>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
