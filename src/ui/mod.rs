//! Console presentation
//!
//! This module handles:
//! - Leveled logging through [`Logger`]
//! - Progress reporting across the pairs of a matrix run
//!
//! Progress goes through the [`ProgressReporter`] trait so a matrix run can
//! draw a bar on a terminal and stay out of the way of verbose pair logs.

pub mod logger;

pub use logger::{LogLevel, Logger};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporting for a sequence of bundler and dependency pairs
pub trait ProgressReporter {
    /// Show the pair about to run
    fn start_pair(&mut self, label: &str, current: usize, total: usize);

    /// Mark the current pair as done
    fn finish_pair(&mut self);

    /// All pairs ran
    fn finish(&mut self);
}

/// Progress bar over all pairs, drawn with indicatif
pub struct InteractiveProgressReporter {
    pairs_pb: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new(total_pairs: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pairs_pb = ProgressBar::new(total_pairs);
        pairs_pb.set_style(style);

        Self { pairs_pb }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_pair(&mut self, label: &str, current: usize, total: usize) {
        self.pairs_pb
            .set_message(format!("({current}/{total}) {label}"));
    }

    fn finish_pair(&mut self) {
        self.pairs_pb.inc(1);
    }

    fn finish(&mut self) {
        self.pairs_pb.finish_and_clear();
    }
}

/// No-op reporter for silent runs and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_pair(&mut self, _label: &str, _current: usize, _total: usize) {}

    fn finish_pair(&mut self) {}

    fn finish(&mut self) {}
}

/// Reporter for a matrix run: a bar when pair output is quiet and stderr is
/// a terminal
pub fn progress_for(pair_logger: &Logger, total_pairs: usize) -> Box<dyn ProgressReporter> {
    if !pair_logger.enabled(LogLevel::Info) && console::user_attended_stderr() {
        Box::new(InteractiveProgressReporter::new(total_pairs as u64))
    } else {
        Box::new(SilentProgressReporter)
    }
}
