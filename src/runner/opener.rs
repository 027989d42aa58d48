//! Fire-and-forget URL opening
//!
//! Dev-server examples only compile once a browser requests the page. When an
//! opener command is configured, loopback URLs found in output are handed to
//! it. The opener is never awaited by the example run; a detached thread reaps
//! it and kills it after a short grace period.

use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use wait_timeout::ChildExt;

/// How long an opener may live before it is killed
pub const OPENER_TIMEOUT: Duration = Duration::from_millis(2000);

/// Launches the configured opener command with a URL appended
#[derive(Debug, Clone, Default)]
pub struct UrlOpener {
    command: Option<String>,
}

impl UrlOpener {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }

    /// Start the opener for `url` and return immediately
    ///
    /// Returns whether an opener process was started.
    pub fn open(&self, url: &str) -> bool {
        let Some(command) = &self.command else {
            return false;
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return false;
        };

        let spawned = Command::new(program)
            .args(parts)
            .arg(url)
            .env("QT_QPA_PLATFORM", "offscreen")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let Ok(mut child) = spawned else {
            return false;
        };

        thread::spawn(move || {
            if !matches!(child.wait_timeout(OPENER_TIMEOUT), Ok(Some(_))) {
                let _ = child.kill();
                let _ = child.wait();
            }
        });
        true
    }
}
