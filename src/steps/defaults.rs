//! The fixed verification sequence.

use crate::config::StepsConfig;

use super::{Expectation, ShellStep, Step};

/// Records which host ran the tests.
pub const PRE_INSTALL: &str = "pre-installation";

/// Upgrades the formula to the new release.
pub const INSTALL: &str = "installation";

/// Confirms the installed binary reports the new version.
pub const CHECK_VERSION: &str = "check version";

/// Functional smoke test.
pub const TEST_RUN: &str = "test run";

/// The four verification steps as declared shell commands.
pub fn default_shell_steps(config: &StepsConfig) -> Vec<ShellStep> {
    vec![
        ShellStep::new(PRE_INSTALL, "echo running on `hostname -f`"),
        ShellStep::new(INSTALL, config.install_command.as_str()),
        ShellStep::new(CHECK_VERSION, config.version_command.as_str())
            .expecting(Expectation::ContainsVersion),
        ShellStep::new(TEST_RUN, config.smoke_command.as_str()).echo_command(),
    ]
    .into_iter()
    .map(|step| step.with_timeout(config.timeout))
    .collect()
}

/// The four verification steps, ready for a [`StepRunner`](super::StepRunner).
pub fn default_steps(config: &StepsConfig) -> Vec<Box<dyn Step>> {
    default_shell_steps(config)
        .into_iter()
        .map(|step| Box::new(step) as Box<dyn Step>)
        .collect()
}
