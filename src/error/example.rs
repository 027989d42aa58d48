//! Example run failures
//!
//! One of these is attached to an example entry when its run did not end in a
//! detected success. They are recovered locally; the pair keeps going.

use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Why a single example run failed
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ExampleError {
    #[error("Errors detected in compilation")]
    #[diagnostic(code(canary::example::compilation_error))]
    CompilationError { output: String },

    #[error("Errors output during compilation: `{command}` in {}", .directory.display())]
    #[diagnostic(code(canary::example::process_error))]
    ProcessError {
        command: String,
        directory: PathBuf,
        output: String,
    },

    #[error("Unable to detect successful compilation ({})", exit_label(.code))]
    #[diagnostic(
        code(canary::example::undetermined),
        help("The process exited before printing a success or error message")
    )]
    Undetermined { code: Option<i32> },

    #[error("Failed to run example `{command}`: {reason}")]
    #[diagnostic(code(canary::example::spawn_failure))]
    SpawnFailure { command: String, reason: String },

    #[error("Example did not finish within {}ms", .after.as_millis())]
    #[diagnostic(
        code(canary::example::timeout),
        help("Raise --timeout if the example is known to be slow")
    )]
    Timeout { after: Duration },
}

impl ExampleError {
    /// Raw process output captured with the failure, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            ExampleError::CompilationError { output } | ExampleError::ProcessError { output, .. } => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
