//! Matrix runs
//!
//! Flattens a [`MatrixConfig`] into bundler and dependency pairs, runs them
//! one after another and folds each outcome into [`MatrixResults`], grouped
//! by bundler in config order.

pub mod summary;

use std::fmt::Write as _;

use crate::config::{DependencyEntry, MatrixConfig};
use crate::discovery;
use crate::error::{CanaryError, Result};
use crate::installer::PackageManager;
use crate::orchestrator::PairReport;
use crate::runner::patterns::OutputPatterns;
use crate::ui::ProgressReporter;

pub use summary::{log_summary, status_rows};

/// One pair to run, with its overrides resolved against the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunItem<'a> {
    pub bundler: &'a str,
    pub entry: &'a DependencyEntry,
    pub package_manager: PackageManager,
    /// Configured output table; `None` keeps the bundler default
    pub output_patterns: Option<&'a OutputPatterns>,
}

impl RunItem<'_> {
    pub fn dependency(&self) -> &str {
        &self.entry.dependency
    }

    /// Example folders for this pair; empty when discovery is skipped
    pub fn example_dirs(&self) -> Vec<String> {
        self.entry
            .example_dirs
            .clone()
            .unwrap_or_else(discovery::default_example_dirs)
    }

    /// `canary run` invocation that reproduces this pair
    pub fn rerun_command(&self) -> String {
        let mut command = format!(
            "canary run --bundler {} --dependency {} --package-manager {}",
            self.bundler,
            self.dependency(),
            self.package_manager
        );
        match &self.entry.example_dirs {
            Some(dirs) if dirs.is_empty() => command.push_str(" --no-examples"),
            Some(dirs) => {
                for dir in dirs {
                    let _ = write!(command, " --example-dir {dir}");
                }
            }
            None => {}
        }
        if let Some(test) = &self.entry.test {
            let _ = write!(command, " --test \"{test}\"");
        }
        command
    }

    pub fn label(&self) -> String {
        format!("{} + {}", self.bundler, self.dependency())
    }
}

/// Every pair in the config, bundler order first, then dependency order
pub fn create_run_list(config: &MatrixConfig) -> Vec<RunItem<'_>> {
    config
        .matrix
        .iter()
        .flat_map(|bundler| {
            let name = bundler.bundler.as_str();
            let output_patterns = config.output_patterns_for(bundler);
            bundler.dependencies.iter().map(move |entry| RunItem {
                bundler: name,
                entry,
                package_manager: entry.package_manager_or(config.package_manager),
                output_patterns,
            })
        })
        .collect()
}

/// How one pair ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairStatus {
    Passed(PairReport),
    /// Some examples or the dependency tests failed
    Failed(PairReport),
    /// The pair could not run its examples at all
    Fatal(String),
}

impl PairStatus {
    pub fn from_outcome(outcome: Result<PairReport>) -> Self {
        match outcome {
            Ok(report) => PairStatus::Passed(report),
            Err(CanaryError::ExamplesFailed { report }) => PairStatus::Failed(report),
            Err(err) => PairStatus::Fatal(err.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, PairStatus::Passed(_))
    }
}

/// Outcome of one pair, with the command that re-runs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairResult {
    pub dependency: String,
    pub rerun: String,
    pub status: PairStatus,
}

/// Pair results grouped by bundler, in run order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixResults {
    bundlers: Vec<(String, Vec<PairResult>)>,
}

impl MatrixResults {
    /// Add a pair result under `bundler`
    #[must_use]
    pub fn record(mut self, bundler: &str, result: PairResult) -> Self {
        match self.bundlers.iter_mut().find(|(name, _)| name == bundler) {
            Some((_, results)) => results.push(result),
            None => self.bundlers.push((bundler.to_string(), vec![result])),
        }
        self
    }

    pub fn bundlers(&self) -> impl Iterator<Item = (&str, &[PairResult])> {
        self.bundlers
            .iter()
            .map(|(name, results)| (name.as_str(), results.as_slice()))
    }

    pub fn pair_count(&self) -> usize {
        self.bundlers.iter().map(|(_, results)| results.len()).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.bundlers
            .iter()
            .flat_map(|(_, results)| results)
            .any(|r| !r.status.passed())
    }
}

/// Run every pair in order with `run_pair`
pub fn run_matrix<F>(
    run_list: &[RunItem<'_>],
    progress: &mut dyn ProgressReporter,
    mut run_pair: F,
) -> MatrixResults
where
    F: FnMut(&RunItem<'_>) -> Result<PairReport>,
{
    let total = run_list.len();
    let results = run_list
        .iter()
        .enumerate()
        .fold(MatrixResults::default(), |results, (index, item)| {
            progress.start_pair(&item.label(), index + 1, total);
            let status = PairStatus::from_outcome(run_pair(item));
            progress.finish_pair();
            results.record(
                item.bundler,
                PairResult {
                    dependency: item.dependency().to_string(),
                    rerun: item.rerun_command(),
                    status,
                },
            )
        });
    progress.finish();
    results
}
