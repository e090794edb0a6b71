//! Configuration validation rules.
//!
//! - The webhook URL must be an http(s) URL
//! - The formula name must be non-empty and contain no path separators
//! - The poll interval must be non-zero
//! - Step commands must be non-empty

use super::Config;
use std::fmt;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_webhook(config));
    errors.extend(validate_formula(config));

    if config.interval.is_zero() {
        errors.push(ValidationError::new(
            "zero-interval",
            "poll interval must be greater than zero",
        ));
    }

    errors.extend(validate_steps(config));

    errors
}

fn validate_webhook(config: &Config) -> Option<ValidationError> {
    let url = config.webhook_url.trim();
    if url.is_empty() {
        return Some(ValidationError::new(
            "missing-webhook",
            format!("webhook URL is empty (set {})", super::WEBHOOK_ENV),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Some(ValidationError::new(
            "invalid-webhook",
            format!("webhook URL '{}' is not an http(s) URL", url),
        ));
    }
    None
}

fn validate_formula(config: &Config) -> Option<ValidationError> {
    let formula = config.formula.trim();
    if formula.is_empty() {
        return Some(ValidationError::new("missing-formula", "formula name is empty"));
    }
    if formula.contains('/') || formula.contains(char::is_whitespace) {
        return Some(ValidationError::new(
            "invalid-formula",
            format!("formula name '{}' must be a bare name", formula),
        ));
    }
    None
}

fn validate_steps(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, command) in [
        ("install command", &config.steps.install_command),
        ("version command", &config.steps.version_command),
        ("smoke command", &config.steps.smoke_command),
    ] {
        if command.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-command",
                format!("{} is empty", name),
            ));
        }
    }

    if config.steps.timeout.is_some_and(|t| t.is_zero()) {
        errors.push(ValidationError::new(
            "zero-step-timeout",
            "step timeout must be greater than zero",
        ));
    }

    errors
}
