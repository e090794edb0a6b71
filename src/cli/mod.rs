//! Command-line interface for brewmon.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - Build the watcher from parsed arguments and drive it

pub mod args;

pub use args::Cli;

use crate::error::Result;
use crate::watcher::{stop_channel, Watcher};

/// Run the monitor described by `cli`.
///
/// With `--once` a single poll is made; otherwise polling continues until a
/// poll fails.
pub fn run(cli: Cli) -> Result<()> {
    let once = cli.once;
    let config = cli.into_config()?;

    tracing::debug!(
        "Watching {} via {} (marker {})",
        config.formula,
        config.api_base,
        config.marker_path.display()
    );

    let watcher = Watcher::from_config(&config)?;

    if once {
        watcher.poll_once()?;
        return Ok(());
    }

    let (_handle, stop) = stop_channel();
    watcher.run(config.interval, &stop)
}
