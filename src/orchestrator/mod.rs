//! Run orchestration for one bundler and dependency pair
//!
//! A pair moves through a fixed sequence of stages and never goes back:
//!
//! 1. **Parse references** - both inputs must resolve, and the bundler input
//!    must name the bundler package
//! 2. **Install** - both packages go into the working root
//! 3. **Discover** - find the dependency's examples (skipped when no example
//!    folders are configured)
//! 4. **Execute** - run every example, one at a time, in discovery order
//! 5. **Test** - optionally run the dependency's own test suite
//! 6. **Aggregate** - fail with the annotated report if anything failed
//!
//! Stages 1 to 3 fail fast. From stage 4 on, failures are recorded on the
//! report and the pair keeps going.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use console::style;

use crate::bundler::BundlerProfile;
use crate::dependency_tests::{TestOutcome, run_dependency_tests};
use crate::discovery;
use crate::error::{CanaryError, ExampleError, Result};
use crate::installer::Installer;
use crate::reference::{self, DependencyReference, ReferenceRole};
use crate::runner::ExampleRunner;
use crate::ui::Logger;
use crate::workspace::WorkingRoot;

/// One discovered example and, once run, why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleEntry {
    /// Folder relative to the example directory; `None` for a root example
    /// until the run assigns it an ordinal name
    pub name: Option<String>,
    pub config_path: PathBuf,
    pub error: Option<ExampleError>,
}

impl ExampleEntry {
    pub fn new(name: Option<String>, config_path: PathBuf) -> Self {
        Self {
            name,
            config_path,
            error: None,
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("example")
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened for one pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairReport {
    pub examples: Vec<ExampleEntry>,
    pub tests: Option<TestOutcome>,
}

impl PairReport {
    pub fn failed_examples(&self) -> impl Iterator<Item = &ExampleEntry> {
        self.examples.iter().filter(|e| !e.passed())
    }

    pub fn tests_failed(&self) -> bool {
        self.tests.as_ref().is_some_and(|t| !t.passed())
    }

    pub fn has_failures(&self) -> bool {
        self.failed_examples().next().is_some() || self.tests_failed()
    }

    /// Short description such as `1 of 3 failed`
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} of {} failed",
            self.failed_examples().count(),
            self.examples.len()
        );
        if self.tests_failed() {
            summary.push_str(", dependency tests failed");
        }
        summary
    }
}

/// Pass-through settings for a pair run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Folders searched for examples; empty skips discovery
    pub example_dirs: Vec<String>,
    /// Dependency test command, run after the examples
    pub test: Option<String>,
    /// Time limit for the test command
    pub test_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            example_dirs: discovery::default_example_dirs(),
            test: None,
            test_timeout: crate::installer::DEFAULT_INSTALL_TIMEOUT,
        }
    }
}

/// Runs one pair end to end
pub struct Pipeline<'a, I, R> {
    pub installer: &'a I,
    pub runner: &'a R,
    pub root: &'a WorkingRoot,
    pub profile: &'a BundlerProfile,
    pub logger: &'a Logger,
    pub options: RunOptions,
}

impl<I: Installer, R: ExampleRunner> Pipeline<'_, I, R> {
    /// Run the pair; `Err(ExamplesFailed)` carries the annotated report
    pub fn run(&self, bundler_input: &str, dependency_input: &str) -> Result<PairReport> {
        let (bundler, dependency) = self.parse_refs(bundler_input, dependency_input)?;

        self.logger.info(format_args!(
            "Installing {} and {} ...",
            style(&bundler).bold(),
            style(&dependency).bold()
        ));
        timed(self.logger, "install", || {
            self.installer.install(&bundler, &dependency)
        })
        .inspect_err(|err| {
            if err.is_timeout() {
                self.logger
                    .warn("Install timed out; a longer install timeout may help");
            }
        })?;

        let discovered = self.discover(&dependency)?;

        if !discovered.is_empty() {
            self.logger.info(format_args!(
                "Running {} with {} ...",
                style(&dependency).bold(),
                style(&bundler).bold()
            ));
        }
        let examples = discovered
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.execute(index, entry, &dependency))
            .collect();

        let tests = self.options.test.as_deref().map(|command| {
            self.logger.info(format_args!(
                "Running {} tests with `{command}` ...",
                style(dependency.name()).bold()
            ));
            let outcome = timed(self.logger, "dependency tests", || {
                run_dependency_tests(
                    self.root,
                    &bundler,
                    &dependency,
                    command,
                    self.options.test_timeout,
                )
            });
            if let Some(err) = &outcome.error {
                self.logger.error(err);
            }
            outcome
        });

        let report = PairReport { examples, tests };
        if report.has_failures() {
            Err(CanaryError::ExamplesFailed { report })
        } else {
            Ok(report)
        }
    }

    fn parse_refs(
        &self,
        bundler_input: &str,
        dependency_input: &str,
    ) -> Result<(DependencyReference, DependencyReference)> {
        let bundler = reference::resolve(Some(bundler_input), ReferenceRole::Bundler).ok_or_else(
            || CanaryError::InvalidReference {
                role: ReferenceRole::Bundler,
                input: bundler_input.to_string(),
            },
        )?;
        if !bundler.is_package(&self.profile.package) {
            return Err(CanaryError::NotBundler {
                input: bundler_input.to_string(),
                name: bundler.name().to_string(),
                expected: self.profile.package.clone(),
            });
        }

        let dependency = reference::resolve(Some(dependency_input), ReferenceRole::Dependency)
            .ok_or_else(|| CanaryError::InvalidReference {
                role: ReferenceRole::Dependency,
                input: dependency_input.to_string(),
            })?;

        Ok((bundler, dependency))
    }

    fn discover(&self, dependency: &DependencyReference) -> Result<Vec<ExampleEntry>> {
        let dirs = &self.options.example_dirs;
        if dirs.is_empty() {
            self.logger.debug("No example folders configured; skipping discovery");
            return Ok(Vec::new());
        }

        self.logger.info(format_args!(
            "Retrieving {} examples ...",
            style(dependency.name()).bold()
        ));
        let found = timed(self.logger, "get examples", || {
            discovery::discover(
                &self.root.modules(),
                dependency.local_name(),
                dirs,
                &self.profile.config_filename,
                self.logger,
            )
        })?;

        if found.is_empty() {
            return Err(CanaryError::NoExamplesFound {
                name: dependency.name().to_string(),
                searched: dirs.join(", "),
            });
        }
        Ok(found)
    }

    /// Run one example and record the outcome on a new entry
    fn execute(
        &self,
        index: usize,
        entry: ExampleEntry,
        dependency: &DependencyReference,
    ) -> ExampleEntry {
        let name = entry
            .name
            .unwrap_or_else(|| format!("example {}", index + 1));
        self.logger.info(format_args!(
            " - {} {} ...",
            dependency.name(),
            style(&name).bold()
        ));

        let error = timed(self.logger, "run example", || {
            self.runner.run(&entry.config_path)
        })
        .err();

        if let Some(err) = &error {
            self.logger.error(err);
            if let Some(output) = err.output() {
                self.logger.error(output);
            }
        }

        ExampleEntry {
            name: Some(name),
            config_path: entry.config_path,
            error,
        }
    }
}

/// Run `f`, logging its duration at debug level
fn timed<T>(logger: &Logger, label: impl fmt::Display, f: impl FnOnce() -> T) -> T {
    logger.debug(format_args!("Start {label}"));
    let started = Instant::now();
    let value = f();
    logger.debug(format_args!(
        "Finished {label} ({}ms)",
        started.elapsed().as_millis()
    ));
    value
}
