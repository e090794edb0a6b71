//! Version-change detection loop.
//!
//! Each poll fetches the latest published version and compares it to the
//! marker. On a change the steps run, the results are sent to the notifier
//! and the marker is updated, in that order. A failed run still updates the
//! marker, so each release is tested once.
//!
//! # Example
//!
//! ```no_run
//! use brewmon::config::Config;
//! use brewmon::watcher::{stop_channel, Watcher};
//!
//! let config = Config::new("https://hooks.slack.com/services/T0/B0/XXXX");
//! let watcher = Watcher::from_config(&config).unwrap();
//!
//! let (_handle, stop) = stop_channel();
//! watcher.run(config.interval, &stop).unwrap();
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::marker::MarkerStore;
use crate::notify::{Notifier, SlackNotifier};
use crate::registry::{RegistryClient, VersionSource};
use crate::steps::{default_steps, StepRunner, TestRunSummary};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// What a single poll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The published version was already tested.
    UpToDate { version: String },

    /// A new version was tested and reported.
    Tested(TestRunSummary),
}

/// Requests a running [`Watcher::run`] loop to stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: mpsc::Sender<()>,
}

impl StopHandle {
    /// Ask the loop to stop after the current poll.
    pub fn stop(&self) {
        // A closed receiver means the loop is already gone.
        let _ = self.tx.send(());
    }
}

/// Receiving side of a stop request; also the loop's interval timer.
#[derive(Debug)]
pub struct StopSignal {
    rx: mpsc::Receiver<()>,
}

impl StopSignal {
    /// Sleep for up to `timeout`, returning `true` if a stop was requested.
    ///
    /// Once every [`StopHandle`] is dropped no stop can arrive, and this
    /// sleeps the full `timeout`.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(timeout);
                false
            }
        }
    }
}

/// Create a connected stop handle and signal.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle { tx }, StopSignal { rx })
}

/// Polls a version source and tests each new version once.
pub struct Watcher<S, N> {
    source: S,
    marker: MarkerStore,
    runner: StepRunner,
    notifier: N,
}

impl Watcher<RegistryClient, SlackNotifier> {
    /// Build a watcher for the Homebrew registry and a Slack webhook.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let source =
            RegistryClient::with_timeout(&config.api_base, &config.formula, config.fetch_timeout)?;
        let notifier = SlackNotifier::new(&config.webhook_url, config.formula_page_url())?;

        Ok(Self::new(
            source,
            MarkerStore::new(&config.marker_path),
            StepRunner::new(default_steps(&config.steps)),
            notifier,
        ))
    }
}

impl<S: VersionSource, N: Notifier> Watcher<S, N> {
    /// Assemble a watcher from its parts.
    pub fn new(source: S, marker: MarkerStore, runner: StepRunner, notifier: N) -> Self {
        Self {
            source,
            marker,
            runner,
            notifier,
        }
    }

    /// The marker this watcher reads and writes.
    pub fn marker(&self) -> &MarkerStore {
        &self.marker
    }

    /// Poll once: test and report the latest version if it is new.
    ///
    /// Fetch, notification and marker-write failures are returned; step
    /// failures are part of the reported summary.
    pub fn poll_once(&self) -> Result<PollOutcome> {
        let version = self.source.latest_version()?;
        let last = self.marker.read_last_version();

        if last == version {
            tracing::info!(
                "Latest version is {} and has already been tested",
                version
            );
            return Ok(PollOutcome::UpToDate { version });
        }

        tracing::info!(
            "Detected new version {} (last tested: {}); running tests",
            version,
            last
        );

        let summary = self.runner.run(&version);
        self.notifier
            .alert(&summary.title(), &summary.sub_alerts(), summary.success)?;
        self.marker.write_last_version(&version)?;

        if summary.success {
            tracing::info!("{}", summary.title());
        } else {
            tracing::warn!("{}", summary.title());
        }

        Ok(PollOutcome::Tested(summary))
    }

    /// Poll every `interval` until `stop` fires or a poll fails.
    ///
    /// No jitter and no backoff; the interval is measured from the end of
    /// one poll to the start of the next.
    pub fn run(&self, interval: Duration, stop: &StopSignal) -> Result<()> {
        tracing::info!(
            "Watching for new versions every {:?} ({} steps per run)",
            interval,
            self.runner.len()
        );

        loop {
            self.poll_once()?;

            if stop.wait(interval) {
                tracing::info!("Stop requested; watcher exiting");
                return Ok(());
            }
        }
    }
}
