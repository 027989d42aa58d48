//! Example execution
//!
//! Runs one example to a verdict. The bundler (or the example's documented
//! command) is spawned in the example directory and its output is classified
//! chunk by chunk until one of these happens:
//!
//! - a stdout chunk mentions an error: [`ExampleError::CompilationError`]
//! - a stdout chunk carries a success sentinel: `Ok(())`
//! - anything arrives on stderr: [`ExampleError::ProcessError`]
//! - the process exits first: [`ExampleError::Undetermined`]
//! - the timeout expires: [`ExampleError::Timeout`]
//!
//! The child is terminated on every one of those paths before `run` returns.

pub mod command;
pub mod opener;
pub mod patterns;
pub mod process;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::bundler::BundlerProfile;
use crate::error::ExampleError;
use crate::ui::Logger;

use command::ExampleCommand;
use opener::UrlOpener;
use patterns::{ChunkVerdict, OutputPatterns};
use process::{ChildHandle, ExitWait, OutputEvent};

/// Default time an example gets to reach a verdict
pub const DEFAULT_EXAMPLE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Runs a single discovered example
pub trait ExampleRunner {
    fn run(&self, config_path: &Path) -> Result<(), ExampleError>;
}

/// Runs examples with an installed bundler
pub struct BundlerRunner<'a> {
    profile: BundlerProfile,
    bundler_bin: PathBuf,
    timeout: Duration,
    opener: UrlOpener,
    logger: &'a Logger,
}

impl<'a> BundlerRunner<'a> {
    /// `modules` is the `node_modules` directory the bundler was installed into
    pub fn new(
        profile: BundlerProfile,
        modules: &Path,
        timeout: Duration,
        opener: UrlOpener,
        logger: &'a Logger,
    ) -> Self {
        let bundler_bin = profile.bin_in(modules);
        Self {
            profile,
            bundler_bin,
            timeout,
            opener,
            logger,
        }
    }
}

impl ExampleRunner for BundlerRunner<'_> {
    fn run(&self, config_path: &Path) -> Result<(), ExampleError> {
        let command =
            ExampleCommand::for_example(config_path, &self.bundler_bin, &self.profile.replacements);
        self.logger.debug(format_args!(
            "Running `{command}` in {}",
            command.cwd.display()
        ));

        let (mut child, events) =
            process::spawn(&command).map_err(|e| ExampleError::SpawnFailure {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let session = Session {
            command: &command,
            patterns: &self.profile.patterns,
            opener: &self.opener,
            timeout: self.timeout,
            logger: self.logger,
        };
        session.watch(&mut child, &events)
    }
}

/// Everything needed to judge one running example
pub(crate) struct Session<'a> {
    pub command: &'a ExampleCommand,
    pub patterns: &'a OutputPatterns,
    pub opener: &'a UrlOpener,
    pub timeout: Duration,
    pub logger: &'a Logger,
}

impl Session<'_> {
    /// Consume output events until a verdict, then terminate the child
    pub fn watch<H: ChildHandle>(
        &self,
        child: &mut H,
        events: &Receiver<OutputEvent>,
    ) -> Result<(), ExampleError> {
        let verdict = self.observe(child, events);
        child.terminate();
        verdict
    }

    fn observe<H: ChildHandle>(
        &self,
        child: &mut H,
        events: &Receiver<OutputEvent>,
    ) -> Result<(), ExampleError> {
        let deadline = Instant::now() + self.timeout;
        let timed_out = ExampleError::Timeout {
            after: self.timeout,
        };
        let mut open_streams = 2_u8;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out);
            }

            match events.recv_timeout(remaining) {
                Ok(OutputEvent::Stdout(chunk)) => match self.patterns.classify(&chunk) {
                    ChunkVerdict::Error => {
                        return Err(ExampleError::CompilationError { output: chunk });
                    }
                    ChunkVerdict::Success => return Ok(()),
                    ChunkVerdict::LocalUrl(url) => {
                        if self.opener.open(&url) {
                            self.logger.debug(format_args!("Opened {url}"));
                        } else if self.opener.is_enabled() {
                            self.logger.warn(format_args!("Failed to open {url}"));
                        }
                    }
                    ChunkVerdict::Info => self.logger.debug(chunk.trim_end()),
                },
                Ok(OutputEvent::Stderr(chunk)) => {
                    return Err(ExampleError::ProcessError {
                        command: self.command.to_string(),
                        directory: self.command.cwd.clone(),
                        output: chunk,
                    });
                }
                Ok(OutputEvent::Closed) => {
                    open_streams = open_streams.saturating_sub(1);
                    if open_streams == 0 {
                        return Err(exited_early(child, remaining, timed_out));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Err(timed_out),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(exited_early(child, remaining, timed_out));
                }
            }
        }
    }
}

/// Both streams closed without a verdict; wait out the exit code
fn exited_early<H: ChildHandle>(
    child: &mut H,
    remaining: Duration,
    timed_out: ExampleError,
) -> ExampleError {
    match child.wait_for_exit(remaining) {
        ExitWait::Exited(code) => ExampleError::Undetermined { code },
        ExitWait::StillRunning => timed_out,
    }
}

#[cfg(test)]
mod tests;
