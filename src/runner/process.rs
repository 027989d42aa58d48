//! Child process plumbing for example runs
//!
//! The child's stdout and stderr are drained by one thread each, which
//! forward chunks over a channel in arrival order. The run loop reads that
//! channel with a deadline, so nothing blocks past the example timeout.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use wait_timeout::ChildExt;

use super::command::ExampleCommand;

const CHUNK_SIZE: usize = 8192;

/// Output of a running example, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Stdout(String),
    Stderr(String),
    /// One of the two streams reached end of file
    Closed,
}

/// Result of waiting for a child to exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitWait {
    /// Exited, with its code if it was not killed by a signal
    Exited(Option<i32>),
    StillRunning,
}

/// The parts of a child process the run loop needs
pub trait ChildHandle {
    /// Kill the child. Calling this more than once has no further effect.
    fn terminate(&mut self);

    /// Wait up to `limit` for the child to exit on its own
    fn wait_for_exit(&mut self, limit: Duration) -> ExitWait;
}

/// A spawned example process, killed on drop if still running
#[derive(Debug)]
pub struct SpawnedChild {
    child: Child,
    finished: bool,
}

impl ChildHandle for SpawnedChild {
    fn terminate(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn wait_for_exit(&mut self, limit: Duration) -> ExitWait {
        if self.finished {
            return ExitWait::Exited(None);
        }
        match self.child.wait_timeout(limit) {
            Ok(Some(status)) => {
                self.finished = true;
                ExitWait::Exited(status.code())
            }
            Ok(None) => ExitWait::StillRunning,
            Err(_) => ExitWait::Exited(None),
        }
    }
}

impl Drop for SpawnedChild {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Spawn the command with piped output, without a shell
pub fn spawn(command: &ExampleCommand) -> io::Result<(SpawnedChild, Receiver<OutputEvent>)> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let (tx, rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        forward(stdout, tx.clone(), OutputEvent::Stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        forward(stderr, tx, OutputEvent::Stderr);
    }

    Ok((
        SpawnedChild {
            child,
            finished: false,
        },
        rx,
    ))
}

fn forward<R>(mut reader: R, tx: Sender<OutputEvent>, wrap: fn(String) -> OutputEvent)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                    if tx.send(wrap(chunk)).is_err() {
                        return;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
        let _ = tx.send(OutputEvent::Closed);
    });
}
