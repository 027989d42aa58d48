//! Error types and handling for Canary
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`example`]: failures of a single example run, recorded on the example
//! - [`command`]: package manager and test command failures
//!
//! Only [`CanaryError`] is ever propagated with `?`. Example failures are
//! captured on their [`ExampleEntry`](crate::orchestrator::ExampleEntry) and
//! surface as [`CanaryError::ExamplesFailed`] once every example has run.

pub mod command;
pub mod example;

pub use command::{CommandError, InstallError, InstallResult, TestStageError};
pub use example::ExampleError;

use miette::Diagnostic;
use thiserror::Error;

use crate::orchestrator::PairReport;
use crate::reference::ReferenceRole;

/// Main error type for Canary operations
#[derive(Error, Diagnostic, Debug)]
pub enum CanaryError {
    // Reference errors
    #[error("{role} details provided are not valid: '{input}'")]
    #[diagnostic(
        code(canary::reference::invalid),
        help(
            "Valid formats: name, name@1.2.3, owner/repo, owner/repo#branch, https://host/owner/repo/subpath#branch"
        )
    )]
    InvalidReference { role: ReferenceRole, input: String },

    #[error("Bundler version is not valid: '{input}' resolves to '{name}', not '{expected}'")]
    #[diagnostic(
        code(canary::reference::not_bundler),
        help("Pass a bare version such as 4.1.0, or {expected}@<version>")
    )]
    NotBundler {
        input: String,
        name: String,
        expected: String,
    },

    // Install errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    Install(#[from] InstallError),

    // Discovery errors
    #[error("Unable to get any examples for '{name}'")]
    #[diagnostic(
        code(canary::discovery::no_examples),
        help("Searched: {searched}. Pass --example-dir to point at the dependency's example folder")
    )]
    NoExamplesFound { name: String, searched: String },

    #[error("Failed to search for examples in {path}: {reason}")]
    #[diagnostic(code(canary::discovery::failed))]
    DiscoveryFailed { path: String, reason: String },

    // Execution errors
    #[error("Error running examples: {}", .report.summary())]
    #[diagnostic(code(canary::run::examples_failed))]
    ExamplesFailed { report: PairReport },

    #[error("{failed} of {total} pairs failed")]
    #[diagnostic(
        code(canary::matrix::pairs_failed),
        help("Re-run a single pair with the command shown in the summary")
    )]
    PairsFailed { failed: usize, total: usize },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(canary::config::not_found),
        help("Create a canary.yaml or pass --config <FILE>")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(canary::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(canary::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(canary::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Could not determine a working root for installs")]
    #[diagnostic(
        code(canary::fs::no_root),
        help("Pass --root <DIR> or set CANARY_ROOT")
    )]
    RootUnavailable,

    #[error("IO error: {message}")]
    #[diagnostic(code(canary::fs::io_error))]
    IoError { message: String },
}

impl CanaryError {
    /// The annotated report when some examples failed, `None` for fatal errors
    pub fn report(&self) -> Option<&PairReport> {
        match self {
            CanaryError::ExamplesFailed { report } => Some(report),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CanaryError {
    fn from(err: std::io::Error) -> Self {
        CanaryError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CanaryError>;
