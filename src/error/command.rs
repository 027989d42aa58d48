//! Package manager and test command errors

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Failure of one external command run to completion
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Error calling `{command}`: {reason}")]
    #[diagnostic(
        code(canary::command::spawn_failed),
        help("Check that the program is installed and on PATH")
    )]
    Spawn { command: String, reason: String },

    #[error("`{command}` exited with {}", exit_label(.code))]
    #[diagnostic(code(canary::command::failed))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Error output when running `{command}`")]
    #[diagnostic(
        code(canary::command::error_output),
        help("Only npm/yarn warning and notice lines are tolerated on stderr")
    )]
    ErrorOutput { command: String, stderr: String },

    #[error("`{command}` timed out after {}ms", .after.as_millis())]
    #[diagnostic(
        code(canary::command::timeout),
        help("Raise --install-timeout for slow registries")
    )]
    Timeout { command: String, after: Duration },
}

/// Failure of the installation step
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("Failed to prepare working root {path}: {reason}")]
    #[diagnostic(code(canary::install::prepare_failed))]
    Prepare { path: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),

    #[error("Expected versions not in dependency tree: '{name}' missing from install output")]
    #[diagnostic(
        code(canary::install::missing_from_output),
        help("The package manager finished but did not report installing '{name}'")
    )]
    MissingFromOutput { name: String, stdout: String },
}

impl InstallError {
    /// Whether the failure was the command timeout rather than a bad exit
    pub fn is_timeout(&self) -> bool {
        matches!(self, InstallError::Command(CommandError::Timeout { .. }))
    }
}

/// Result of the installation step
pub type InstallResult<T> = std::result::Result<T, InstallError>;

/// Failure of the optional dependency test stage
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TestStageError {
    #[error("Failed to move the dependency into {path}: {reason}")]
    #[diagnostic(code(canary::tests::relocate_failed))]
    Relocate { path: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}
