//! HTTP client for the formula JSON API.

use crate::error::{MonitorError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{formula_api_url, VersionSource};

/// User agent sent with every registry request.
pub const USER_AGENT: &str = "brewmon";

/// Registry requests give up after this long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// The subset of the formula document brewmon reads.
#[derive(Debug, Clone, Deserialize)]
pub struct FormulaInfo {
    pub versions: FormulaVersions,
}

/// Published versions of a formula.
#[derive(Debug, Clone, Deserialize)]
pub struct FormulaVersions {
    /// Latest stable version; absent for head-only formulae.
    pub stable: Option<String>,
}

/// Fetches formula versions over HTTP.
pub struct RegistryClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl RegistryClient {
    /// Create a client for `formula` with the default 2-second timeout.
    pub fn new(api_base: &str, formula: &str) -> Result<Self> {
        Self::with_timeout(api_base, formula, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(api_base: &str, formula: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::Error::new(e).context("Failed to build HTTP client"))?;

        Ok(Self {
            client,
            url: formula_api_url(api_base, formula),
            timeout,
        })
    }

    /// The formula document URL this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the latest stable version of the formula.
    pub fn fetch_latest_version(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|source| MonitorError::Network {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MonitorError::Remote {
                url: self.url.clone(),
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|source| MonitorError::Network {
            url: self.url.clone(),
            source,
        })?;

        parse_stable_version(&body).map_err(|message| MonitorError::Parse {
            url: self.url.clone(),
            message,
        })
    }
}

impl VersionSource for RegistryClient {
    fn latest_version(&self) -> Result<String> {
        self.fetch_latest_version()
    }
}

/// Extract `versions.stable` from a formula document.
fn parse_stable_version(body: &str) -> std::result::Result<String, String> {
    let info: FormulaInfo = serde_json::from_str(body).map_err(|e| e.to_string())?;

    match info.versions.stable {
        Some(stable) if !stable.trim().is_empty() => Ok(stable.trim().to_string()),
        _ => Err("no stable version published".to_string()),
    }
}
