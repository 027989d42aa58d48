//! Installation step
//!
//! Installs the bundler and the dependency side by side into the working
//! root with one package manager call, checks both show up in its output,
//! then installs the dependency's own dependencies inside its install
//! location so its examples can build.

pub mod command;

use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{InstallError, InstallResult};
use crate::reference::DependencyReference;
use crate::ui::Logger;
use crate::workspace::WorkingRoot;

use command::{StderrPolicy, run_command};

/// Default time a single package manager command may take
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Supported package managers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    /// Command that adds both packages to the working root
    pub fn install_command(self, bundler: &str, dependency: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm install {bundler} {dependency}"),
            PackageManager::Yarn => format!("yarn add {bundler} {dependency}"),
        }
    }

    /// Command that installs a package's declared dependencies in place
    pub fn deps_command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Yarn => write!(f, "yarn"),
        }
    }
}

/// Installs a bundler and dependency pair
pub trait Installer {
    /// Install both packages; returns the package manager's output
    fn install(
        &self,
        bundler: &DependencyReference,
        dependency: &DependencyReference,
    ) -> InstallResult<String>;
}

/// Installer backed by npm or yarn
pub struct PackageManagerInstaller<'a> {
    manager: PackageManager,
    root: WorkingRoot,
    timeout: Duration,
    logger: &'a Logger,
}

impl<'a> PackageManagerInstaller<'a> {
    pub fn new(
        manager: PackageManager,
        root: WorkingRoot,
        timeout: Duration,
        logger: &'a Logger,
    ) -> Self {
        Self {
            manager,
            root,
            timeout,
            logger,
        }
    }
}

impl Installer for PackageManagerInstaller<'_> {
    fn install(
        &self,
        bundler: &DependencyReference,
        dependency: &DependencyReference,
    ) -> InstallResult<String> {
        self.root.prepare()?;

        let install = self
            .manager
            .install_command(&bundler.install_specifier(), &dependency.install_specifier());
        self.logger.debug(format_args!(
            "Running `{install}` in {}",
            self.root.path().display()
        ));
        let stdout = run_command(&install, self.root.path(), self.timeout, StderrPolicy::Strict)?;

        check_installed(&stdout, &[bundler, dependency])?;

        let location = self.root.install_location(dependency);
        let deps = self.manager.deps_command();
        self.logger.debug(format_args!(
            "Running `{deps}` in {}",
            location.display()
        ));
        let deps_stdout = run_command(deps, &location, self.timeout, StderrPolicy::Strict)?;

        Ok(deps_stdout)
    }
}

/// Both packages must be named in the install output
pub fn check_installed(stdout: &str, references: &[&DependencyReference]) -> InstallResult<()> {
    match references
        .iter()
        .find(|reference| !stdout.contains(reference.local_name()))
    {
        Some(missing) => Err(InstallError::MissingFromOutput {
            name: missing.local_name().to_string(),
            stdout: stdout.to_string(),
        }),
        None => Ok(()),
    }
}
