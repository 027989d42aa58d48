//! Running package manager and test commands to completion
//!
//! Unlike example runs, these commands are expected to exit. Output is
//! collected in full, the exit code is checked, then stderr is screened.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::CommandError;

/// Stderr line prefixes package managers use for harmless chatter
const BENIGN_STDERR_PREFIXES: &[&str] = &[
    "npm WARN",
    "npm warn",
    "npm notice",
    "warning",
    "info",
    "notice",
];

/// How stderr output affects the outcome of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrPolicy {
    /// Any stderr line that is not benign fails the command
    Strict,
    /// Stderr is ignored; only the exit code counts
    Ignore,
}

/// Whether a stderr line is a package manager warning or notice
pub fn is_benign_stderr(line: &str) -> bool {
    let line = line.trim();
    line.is_empty()
        || BENIGN_STDERR_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

/// Run `command_line` in `cwd` and return its stdout
///
/// The command line is split on whitespace and run without a shell. The
/// process is killed if it outlives `timeout`.
pub fn run_command(
    command_line: &str,
    cwd: &Path,
    timeout: Duration,
    policy: StderrPolicy,
) -> Result<String, CommandError> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| CommandError::Spawn {
        command: command_line.to_string(),
        reason: "empty command".to_string(),
    })?;

    let mut child = Command::new(program)
        .args(parts)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CommandError::Spawn {
            command: command_line.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = collect(child.stdout.take());
    let stderr = collect(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Timeout {
                command: command_line.to_string(),
                after: timeout,
            });
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Spawn {
                command: command_line.to_string(),
                reason: e.to_string(),
            });
        }
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    if !status.success() {
        return Err(CommandError::Failed {
            command: command_line.to_string(),
            code: status.code(),
            stderr,
        });
    }

    if policy == StderrPolicy::Strict && !stderr.lines().all(is_benign_stderr) {
        return Err(CommandError::ErrorOutput {
            command: command_line.to_string(),
            stderr,
        });
    }

    Ok(stdout)
}

fn collect<R>(reader: Option<R>) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_end(&mut bytes);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}
