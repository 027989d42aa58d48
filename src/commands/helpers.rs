//! Wiring shared by the run and matrix commands

use std::path::PathBuf;
use std::time::Duration;

use crate::bundler::BundlerProfile;
use crate::error::Result;
use crate::installer::{PackageManager, PackageManagerInstaller};
use crate::orchestrator::{PairReport, Pipeline, RunOptions};
use crate::runner::BundlerRunner;
use crate::runner::opener::UrlOpener;
use crate::runner::patterns::OutputPatterns;
use crate::ui::Logger;
use crate::workspace::WorkingRoot;

/// The working root from `--root`/`CANARY_ROOT`, else the cache location
pub fn working_root(root: Option<PathBuf>) -> Result<WorkingRoot> {
    match root {
        Some(path) => WorkingRoot::new(path),
        None => WorkingRoot::default_location(),
    }
}

/// Settings for one pair, after CLI flags and config are merged
#[derive(Debug, Clone)]
pub struct PairSettings {
    pub root: WorkingRoot,
    pub package_manager: PackageManager,
    pub example_dirs: Vec<String>,
    pub example_timeout: Duration,
    pub install_timeout: Duration,
    pub test: Option<String>,
    pub open_url_command: Option<String>,
    /// Replaces the bundler's default output table
    pub output_patterns: Option<OutputPatterns>,
}

/// Build the real installer and runner and run the pair
pub fn run_pair(
    settings: &PairSettings,
    logger: &Logger,
    bundler: &str,
    dependency: &str,
) -> Result<PairReport> {
    let profile = profile_for(settings);
    let installer = PackageManagerInstaller::new(
        settings.package_manager,
        settings.root.clone(),
        settings.install_timeout,
        logger,
    );
    let runner = BundlerRunner::new(
        profile.clone(),
        &settings.root.modules(),
        settings.example_timeout,
        UrlOpener::new(settings.open_url_command.clone()),
        logger,
    );

    let pipeline = Pipeline {
        installer: &installer,
        runner: &runner,
        root: &settings.root,
        profile: &profile,
        logger,
        options: RunOptions {
            example_dirs: settings.example_dirs.clone(),
            test: settings.test.clone(),
            test_timeout: settings.install_timeout,
        },
    };
    pipeline.run(bundler, dependency)
}

/// The default bundler profile with any configured output table applied
fn profile_for(settings: &PairSettings) -> BundlerProfile {
    let profile = BundlerProfile::default();
    match &settings.output_patterns {
        Some(patterns) => profile.with_patterns(patterns.clone()),
        None => profile,
    }
}
