//! Runtime configuration for brewmon.
//!
//! A [`Config`] is built once at startup (see [`crate::cli::Cli::into_config`])
//! and handed to the watcher; nothing reads the environment after that.
//!
//! # Example
//!
//! ```
//! use brewmon::config::Config;
//! use std::time::Duration;
//!
//! let mut config = Config::new("https://hooks.slack.com/services/T0/B0/XXXX");
//! config.interval = Duration::from_secs(60);
//! config.validate().unwrap();
//! assert_eq!(config.formula, "earthly");
//! ```

pub mod validator;

pub use validator::{validate_config, ValidationError};

use crate::error::{MonitorError, Result};
use crate::marker::DEFAULT_MARKER_PATH;
use crate::registry::{client::DEFAULT_TIMEOUT, formula_page_url, DEFAULT_API_BASE};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the notification webhook URL.
pub const WEBHOOK_ENV: &str = "BREWMON_WEBHOOK_URL";

/// Older webhook variable, read when [`WEBHOOK_ENV`] is unset.
pub const LEGACY_WEBHOOK_ENV: &str = "EARTHLY_ALERT_WEBHOOK";

/// Formula watched when none is configured.
pub const DEFAULT_FORMULA: &str = "earthly";

/// Time between polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Upgrade command for the default formula.
pub const DEFAULT_INSTALL_COMMAND: &str = "brew upgrade earthly";

/// Version check run after installing.
pub const DEFAULT_VERSION_COMMAND: &str = "earthly --version";

/// Smoke test run last.
pub const DEFAULT_SMOKE_COMMAND: &str = "earthly github.com/earthly/earthly/examples/go+docker";

/// Everything the monitor needs to run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Incoming-webhook URL notifications are posted to.
    pub webhook_url: String,

    /// Homebrew formula to watch.
    pub formula: String,

    /// Root of the formula JSON API.
    pub api_base: String,

    /// Where the last tested version is recorded.
    pub marker_path: PathBuf,

    /// Time between polls.
    pub interval: Duration,

    /// Registry request timeout.
    pub fetch_timeout: Duration,

    /// Commands for the verification steps.
    pub steps: StepsConfig,
}

/// Commands and limits for the verification steps.
///
/// [`StepsConfig::for_formula`] derives the install and version commands
/// from a formula name; the smoke test always has to be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsConfig {
    /// Installs or upgrades to the new release.
    pub install_command: String,

    /// Command whose output must contain the new version.
    pub version_command: String,

    /// Functional smoke test.
    pub smoke_command: String,

    /// Per-step timeout (None = wait forever).
    pub timeout: Option<Duration>,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            version_command: DEFAULT_VERSION_COMMAND.to_string(),
            smoke_command: DEFAULT_SMOKE_COMMAND.to_string(),
            timeout: None,
        }
    }
}

impl StepsConfig {
    /// Commands for `formula`, keeping the default smoke test.
    pub fn for_formula(formula: &str) -> Self {
        Self {
            install_command: format!("brew upgrade {}", formula),
            version_command: format!("{} --version", formula),
            ..Default::default()
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the webhook.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            formula: DEFAULT_FORMULA.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            marker_path: PathBuf::from(DEFAULT_MARKER_PATH),
            interval: DEFAULT_INTERVAL,
            fetch_timeout: DEFAULT_TIMEOUT,
            steps: StepsConfig::default(),
        }
    }

    /// Link used as the notification title target.
    pub fn formula_page_url(&self) -> String {
        formula_page_url(&self.formula)
    }

    /// Check the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let errors = validate_config(self);
        if errors.is_empty() {
            return Ok(());
        }

        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(MonitorError::Config { message })
    }
}
