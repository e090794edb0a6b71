//! Sequential step runner.
//!
//! Runs steps strictly in order and stops at the first failure. Failures
//! are recorded as results, never returned as errors.

use crate::error::MonitorError;
use crate::notify::SubAlert;
use std::time::Instant;

use super::Step;

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Step name.
    pub title: String,

    /// Captured output, or the failure description.
    pub output: String,

    /// Whether the step passed.
    pub success: bool,
}

impl StepResult {
    /// Create a success result.
    pub fn success(title: &str, output: String) -> Self {
        Self {
            title: title.to_string(),
            output,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(title: &str, output: String) -> Self {
        Self {
            title: title.to_string(),
            output,
            success: false,
        }
    }
}

/// Everything one test run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunSummary {
    /// Version under test.
    pub version: String,

    /// Executed steps, in the order they ran.
    pub results: Vec<StepResult>,

    /// True only if every step ran and passed.
    pub success: bool,
}

impl TestRunSummary {
    /// Notification title for this run.
    pub fn title(&self) -> String {
        if self.success {
            format!("tests for version {:?} OK", self.version)
        } else {
            format!("tests for version {:?} failed", self.version)
        }
    }

    /// The executed steps as notification fields.
    pub fn sub_alerts(&self) -> Vec<SubAlert> {
        self.results
            .iter()
            .map(|r| SubAlert {
                title: r.title.clone(),
                output: r.output.clone(),
            })
            .collect()
    }

    /// The step that ended the run, if any failed.
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.results.iter().find(|r| !r.success)
    }
}

/// Runs an ordered list of steps.
pub struct StepRunner {
    steps: Vec<Box<dyn Step>>,
}

impl StepRunner {
    /// Create a runner over `steps`.
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// Number of planned steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the planned steps, in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step against `version`, stopping at the first failure.
    pub fn run(&self, version: &str) -> TestRunSummary {
        tracing::info!(
            "Testing version {} ({} steps)",
            version,
            self.steps.len()
        );

        let mut results = Vec::with_capacity(self.steps.len());
        let mut success = true;

        for step in &self.steps {
            let name = step.name();
            let start = Instant::now();
            tracing::debug!("Running step '{}'", name);

            let result = match step.run(version) {
                Ok(output) => StepResult::success(name, output),
                Err(MonitorError::StepFailed { output, .. }) => StepResult::failure(name, output),
                Err(e) => StepResult::failure(name, e.to_string()),
            };

            if result.success {
                tracing::info!("Step '{}' passed in {:?}", name, start.elapsed());
            } else {
                tracing::warn!("Step '{}' failed after {:?}", name, start.elapsed());
            }

            success = result.success;
            results.push(result);

            if !success {
                break;
            }
        }

        TestRunSummary {
            version: version.to_string(),
            results,
            success,
        }
    }
}
