//! CLI argument definitions.
//!
//! Every option can also come from the environment, so the monitor can be
//! configured entirely from a service unit or container environment.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    Config, StepsConfig, DEFAULT_FORMULA, DEFAULT_SMOKE_COMMAND, LEGACY_WEBHOOK_ENV, WEBHOOK_ENV,
};
use crate::error::{MonitorError, Result};
use crate::marker::DEFAULT_MARKER_PATH;
use crate::registry::DEFAULT_API_BASE;

/// Watch a Homebrew formula and smoke-test every new release.
#[derive(Debug, Parser)]
#[command(name = "brewmon")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Incoming-webhook URL for notifications
    #[arg(long, env = WEBHOOK_ENV, hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Fallback for deployments still setting the older variable
    #[arg(long, env = LEGACY_WEBHOOK_ENV, hide = true, hide_env_values = true)]
    pub alert_webhook: Option<String>,

    /// Homebrew formula to watch
    #[arg(long, env = "BREWMON_FORMULA", default_value = DEFAULT_FORMULA)]
    pub formula: String,

    /// Root of the formula JSON API
    #[arg(long, env = "BREWMON_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// File recording the last tested version
    #[arg(long, env = "BREWMON_MARKER", default_value = DEFAULT_MARKER_PATH)]
    pub marker: PathBuf,

    /// Seconds between polls
    #[arg(long, env = "BREWMON_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,

    /// Kill a step that runs longer than this many seconds
    #[arg(long, env = "BREWMON_STEP_TIMEOUT_SECS")]
    pub step_timeout_secs: Option<u64>,

    /// Install command (default: brew upgrade <formula>)
    #[arg(long, env = "BREWMON_INSTALL_COMMAND")]
    pub install_command: Option<String>,

    /// Command whose output must contain the new version (default: <formula> --version)
    #[arg(long, env = "BREWMON_VERSION_COMMAND")]
    pub version_command: Option<String>,

    /// Functional smoke test run last
    #[arg(long, env = "BREWMON_SMOKE_COMMAND", default_value = DEFAULT_SMOKE_COMMAND)]
    pub smoke_command: String,

    /// Poll once and exit
    #[arg(long)]
    pub once: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Turn parsed arguments into a validated [`Config`].
    pub fn into_config(self) -> Result<Config> {
        let webhook_url = self
            .webhook_url
            .or(self.alert_webhook)
            .ok_or_else(|| MonitorError::Config {
                message: format!("{} is not set", WEBHOOK_ENV),
            })?;

        let defaults = StepsConfig::for_formula(&self.formula);
        let steps = StepsConfig {
            install_command: self.install_command.unwrap_or(defaults.install_command),
            version_command: self.version_command.unwrap_or(defaults.version_command),
            smoke_command: self.smoke_command,
            timeout: self.step_timeout_secs.map(Duration::from_secs),
        };

        let mut config = Config::new(webhook_url);
        config.formula = self.formula;
        config.api_base = self.api_base;
        config.marker_path = self.marker;
        config.interval = Duration::from_secs(self.interval_secs);
        config.steps = steps;

        config.validate()?;
        Ok(config)
    }
}
