//! Verification steps run against each new release.
//!
//! - [`Step`] - One unit of the test sequence
//! - [`ShellStep`] - A step declared as a shell command plus an expectation
//! - [`default_steps`] - The fixed pre-install / install / verify / smoke sequence
//! - [`StepRunner`] - Runs steps in order, stopping at the first failure
//! - [`TestRunSummary`] - What one run produced, ready for the notifier
//!
//! # Example
//!
//! ```no_run
//! use brewmon::steps::{Expectation, ShellStep, Step, StepRunner};
//!
//! let steps: Vec<Box<dyn Step>> = vec![
//!     Box::new(ShellStep::new("installation", "brew upgrade jq")),
//!     Box::new(
//!         ShellStep::new("check version", "jq --version")
//!             .expecting(Expectation::ContainsVersion),
//!     ),
//! ];
//!
//! let summary = StepRunner::new(steps).run("1.7.1");
//! println!("{}", summary.title());
//! ```

pub mod defaults;
pub mod executor;
pub mod shell_step;

pub use defaults::default_steps;
pub use executor::{StepResult, StepRunner, TestRunSummary};
pub use shell_step::{Expectation, ShellStep};

use crate::error::Result;

/// One named unit of the test sequence.
pub trait Step {
    /// Name shown as the notification field title.
    fn name(&self) -> &str;

    /// Run the step against `version`.
    ///
    /// `Ok` carries the captured output of a passing step. A failing step
    /// returns [`MonitorError::StepFailed`](crate::MonitorError::StepFailed)
    /// with its output; any other error is reported by its message.
    fn run(&self, version: &str) -> Result<String>;
}
