//! Homebrew formula registry polling.
//!
//! The registry publishes one JSON document per formula. Only the stable
//! version is read:
//!
//! ```json
//! { "versions": { "stable": "0.8.15" } }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use brewmon::registry::{RegistryClient, VersionSource, DEFAULT_API_BASE};
//!
//! let client = RegistryClient::new(DEFAULT_API_BASE, "earthly").unwrap();
//! let version = client.latest_version().unwrap();
//! println!("earthly {}", version);
//! ```

pub mod client;

pub use client::{FormulaInfo, FormulaVersions, RegistryClient};

use crate::error::Result;

/// Formula JSON API root.
pub const DEFAULT_API_BASE: &str = "https://formulae.brew.sh/api/formula";

/// Human-facing formula page root.
pub const FORMULA_PAGE_BASE: &str = "https://formulae.brew.sh/formula";

/// Anything that can report the latest published version.
pub trait VersionSource {
    /// Fetch the current stable version.
    fn latest_version(&self) -> Result<String>;
}

impl<T: VersionSource + ?Sized> VersionSource for &T {
    fn latest_version(&self) -> Result<String> {
        (**self).latest_version()
    }
}

/// Link to the registry page for `formula`.
pub fn formula_page_url(formula: &str) -> String {
    format!("{}/{}", FORMULA_PAGE_BASE, formula)
}

/// JSON endpoint for `formula` under `api_base`.
pub fn formula_api_url(api_base: &str, formula: &str) -> String {
    format!("{}/{}.json", api_base.trim_end_matches('/'), formula)
}
