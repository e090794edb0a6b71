//! Persistent last-tested version marker.
//!
//! The marker is a single plain-text file holding the version string of the
//! last release a test run completed for. A missing or unreadable marker
//! reads as [`UNKNOWN_VERSION`], so the first poll always triggers a run.

use crate::error::{MonitorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Sentinel returned when no marker has been recorded.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Default marker location.
pub const DEFAULT_MARKER_PATH: &str = "/tmp/last-earth-check";

/// Reads and writes the version marker file.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last recorded version.
    ///
    /// Never fails: an absent, unreadable or empty marker yields
    /// [`UNKNOWN_VERSION`].
    pub fn read_last_version(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
            Ok(_) => UNKNOWN_VERSION.to_string(),
            Err(e) => {
                tracing::debug!("No usable marker at {}: {}", self.path.display(), e);
                UNKNOWN_VERSION.to_string()
            }
        }
    }

    /// Overwrite the marker with `version`.
    ///
    /// The new content is written to a sibling temp file and renamed into
    /// place, so readers never see a partial write.
    pub fn write_last_version(&self, version: &str) -> Result<()> {
        let to_marker_error = |source| MonitorError::Marker {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(to_marker_error)?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, version).map_err(to_marker_error)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(to_marker_error(e));
        }

        tracing::debug!("Recorded version {} in {}", version, self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PATH)
    }
}
