//! brewmon - Homebrew release watcher.
//!
//! Polls the Homebrew formula API for a formula's stable version. Each new
//! version is installed and smoke-tested by a fixed sequence of shell
//! steps, and the outcome is posted to a Slack incoming webhook.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Runtime configuration and validation
//! - [`error`] - Error types and result aliases
//! - [`marker`] - Persisted last-tested version
//! - [`notify`] - Slack attachment payloads and delivery
//! - [`registry`] - Formula version lookups
//! - [`shell`] - Shell command execution
//! - [`steps`] - Verification steps and their runner
//! - [`watcher`] - Change detection and the polling loop
//!
//! # Example
//!
//! ```
//! use brewmon::notify::{build_notification, SubAlert};
//!
//! let alerts = vec![SubAlert {
//!     title: "installation".to_string(),
//!     output: "==> Upgrading earthly".to_string(),
//! }];
//! let payload = build_notification(
//!     "tests for version \"0.8.15\" OK",
//!     "https://formulae.brew.sh/formula/earthly",
//!     &alerts,
//!     true,
//! );
//! assert_eq!(payload.attachments[0].color, "#00CC00");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod marker;
pub mod notify;
pub mod registry;
pub mod shell;
pub mod steps;
pub mod watcher;

pub use error::{MonitorError, Result};
