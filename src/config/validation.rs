//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic, including level names)
//! - Reject unusable watchdog periods
//! - Detect empty and duplicate declarations
//! - Detect placeholders no event can fill
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::compose::{placeholders, LoggerFormats, PLACEHOLDERS};
use crate::config::schema::LoggerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("watchdog.period_ms must be greater than zero")]
    ZeroWatchdogPeriod,

    #[error("declaration #{index} has an empty target")]
    EmptyTarget { index: usize },

    #[error("declaration #{index} has an empty method name")]
    EmptyMethod { index: usize },

    #[error("duplicate declaration for {}", qualified(.target, .method))]
    DuplicateDeclaration {
        target: String,
        method: Option<String>,
    },

    #[error("levels.loggers contains an empty logger name")]
    EmptyLoggerName,

    #[error("formats.{template} uses unknown placeholder `${{{placeholder}}}`")]
    UnknownPlaceholder {
        template: &'static str,
        placeholder: String,
    },
}

fn qualified(target: &str, method: &Option<String>) -> String {
    match method {
        Some(method) => format!("{target}::{method}"),
        None => target.to_string(),
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.watchdog.period_ms == 0 {
        errors.push(ValidationError::ZeroWatchdogPeriod);
    }

    if config.levels.loggers.keys().any(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptyLoggerName);
    }

    let mut seen = HashSet::new();
    for (index, decl) in config.declarations.iter().enumerate() {
        if decl.target.trim().is_empty() {
            errors.push(ValidationError::EmptyTarget { index });
            continue;
        }
        if decl.method.as_deref().is_some_and(|m| m.trim().is_empty()) {
            errors.push(ValidationError::EmptyMethod { index });
            continue;
        }
        if !seen.insert((decl.target.as_str(), decl.method.as_deref())) {
            errors.push(ValidationError::DuplicateDeclaration {
                target: decl.target.clone(),
                method: decl.method.clone(),
            });
        }
    }

    validate_formats(&config.formats, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_formats(formats: &LoggerFormats, errors: &mut Vec<ValidationError>) {
    for (template, text) in formats.named() {
        for placeholder in placeholders(text) {
            if !PLACEHOLDERS.contains(&placeholder) {
                errors.push(ValidationError::UnknownPlaceholder {
                    template,
                    placeholder: placeholder.to_string(),
                });
            }
        }
    }
}
