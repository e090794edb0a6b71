//! Steps declared as shell commands.

use crate::error::{MonitorError, Result};
use crate::shell::{execute, CommandOptions};
use std::time::Duration;

use super::Step;

/// What a step's output must satisfy beyond a zero exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expectation {
    /// Exit status zero is enough.
    #[default]
    ExitSuccess,

    /// The expected version must appear verbatim in the output.
    ContainsVersion,
}

/// A step that runs one shell command line.
#[derive(Debug, Clone)]
pub struct ShellStep {
    /// Step name.
    pub name: String,

    /// Command line passed to `sh -c`.
    pub command: String,

    /// Output check applied after a successful exit.
    pub expectation: Expectation,

    /// Prefix the reported output with `$ <command>`.
    pub echo_command: bool,

    /// Kill the command after this long.
    pub timeout: Option<Duration>,
}

impl ShellStep {
    /// Create a step that passes on exit status zero.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            expectation: Expectation::ExitSuccess,
            echo_command: false,
            timeout: None,
        }
    }

    /// Set the output expectation.
    pub fn expecting(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }

    /// Echo the command line at the top of the reported output.
    pub fn echo_command(mut self) -> Self {
        self.echo_command = true;
        self
    }

    /// Set a timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn failed(&self, output: String) -> MonitorError {
        MonitorError::StepFailed {
            step: self.name.clone(),
            output,
        }
    }
}

impl Step for ShellStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, version: &str) -> Result<String> {
        let options = CommandOptions {
            timeout: self.timeout,
        };

        let result = execute(&self.command, &options)?;

        let mut output = if self.echo_command {
            format!("$ {}\n{}", self.command, result.output)
        } else {
            result.output
        };

        if result.timed_out {
            let limit = self.timeout.unwrap_or(result.duration);
            output.push_str(&format!("\ntimed out after {:?}", limit));
            return Err(self.failed(output));
        }

        if !result.success {
            return Err(self.failed(output));
        }

        if self.expectation == Expectation::ContainsVersion && !output.contains(version) {
            return Err(self.failed(format!(
                "expected to find version string {:?} in {:?}",
                version, output
            )));
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn failure_output(err: MonitorError) -> String {
        match err {
            MonitorError::StepFailed { output, .. } => output,
            other => panic!("Expected StepFailed, got {:?}", other),
        }
    }

    #[test]
    fn passing_command_returns_output() {
        let step = ShellStep::new("pre-installation", "echo running on test-host");

        let output = step.run("1.2.3").unwrap();

        assert_eq!(output, "running on test-host\n");
    }

    #[test]
    fn failing_command_returns_step_failed_with_output() {
        let step = ShellStep::new("installation", "echo 'Error: no such formula' >&2; exit 1");

        let err = step.run("1.2.3").unwrap_err();

        assert!(failure_output(err).contains("Error: no such formula"));
    }

    #[test]
    fn failure_names_the_step() {
        let step = ShellStep::new("installation", "exit 1");

        match step.run("1.2.3").unwrap_err() {
            MonitorError::StepFailed { step, .. } => assert_eq!(step, "installation"),
            other => panic!("Expected StepFailed, got {:?}", other),
        }
    }

    #[test]
    fn contains_version_passes_when_version_present() {
        let step = ShellStep::new("check version", "echo 'earthly version v1.2.3 abcdef'")
            .expecting(Expectation::ContainsVersion);

        let output = step.run("1.2.3").unwrap();

        assert!(output.contains("v1.2.3"));
    }

    #[test]
    fn contains_version_fails_with_expected_and_actual() {
        let step = ShellStep::new("check version", "echo 'earthly version v1.2.2'")
            .expecting(Expectation::ContainsVersion);

        let output = failure_output(step.run("1.2.3").unwrap_err());

        assert!(output.contains("expected to find version string"));
        assert!(output.contains("\"1.2.3\""));
        assert!(output.contains("earthly version v1.2.2"));
    }

    #[test]
    fn contains_version_is_a_literal_match() {
        let step = ShellStep::new("check version", "echo 'version 1x2x3'")
            .expecting(Expectation::ContainsVersion);

        assert!(step.run("1.2.3").is_err());
    }

    #[test]
    fn exit_failure_wins_over_version_check() {
        let step = ShellStep::new("check version", "echo 'oops'; exit 2")
            .expecting(Expectation::ContainsVersion);

        let output = failure_output(step.run("1.2.3").unwrap_err());

        assert_eq!(output, "oops\n");
    }

    #[test]
    fn echo_command_prefixes_output() {
        let step = ShellStep::new("test run", "echo built").echo_command();

        let output = step.run("1.2.3").unwrap();

        assert_eq!(output, "$ echo built\nbuilt\n");
    }

    #[test]
    fn echo_command_is_kept_on_failure() {
        let step = ShellStep::new("test run", "echo broken; exit 1").echo_command();

        let output = failure_output(step.run("1.2.3").unwrap_err());

        assert!(output.starts_with("$ echo broken; exit 1\n"));
        assert!(output.contains("broken\n"));
    }

    #[test]
    fn timed_out_command_fails() {
        let step = ShellStep::new("test run", "sleep 5")
            .with_timeout(Some(Duration::from_millis(200)));

        let output = failure_output(step.run("1.2.3").unwrap_err());

        assert!(output.contains("timed out"));
    }

    #[test]
    fn builder_defaults() {
        let step = ShellStep::new("x", "true");
        assert_eq!(step.expectation, Expectation::ExitSuccess);
        assert!(!step.echo_command);
        assert!(step.timeout.is_none());
    }
}
