//! Error types for brewmon operations.
//!
//! This module defines [`MonitorError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Step failures (`StepFailed`, `CommandFailed`) are recovered by the
//!   step runner and reported through the notifier
//! - Everything else propagates to `main`, which logs it and exits nonzero
//! - Use `anyhow::Error` (via `MonitorError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for brewmon operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Transport-level HTTP failure (connect, timeout, TLS, body read).
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    Parse { url: String, message: String },

    /// Remote endpoint answered with a non-success status.
    #[error("{url} returned {code}: {body}")]
    Remote { url: String, code: u16, body: String },

    /// The version marker could not be written.
    #[error("Failed to write version marker {}: {source}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A verification step failed; `output` is what gets reported.
    #[error("Step '{step}' failed")]
    StepFailed { step: String, output: String },

    /// Shell command could not be started or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Invalid or missing configuration.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for brewmon operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
