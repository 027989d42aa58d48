//! Bundler profile
//!
//! Everything Canary needs to know about the bundler under test: its package
//! name, the config filename examples use, where its CLI lives once
//! installed, and how to read its console output.

use std::path::{Path, PathBuf};

use crate::runner::command::Replacement;
use crate::runner::patterns::OutputPatterns;

/// Package name of the bundler; bare versions resolve to this package
pub const BUNDLER_PACKAGE: &str = "webpack";

/// Config filename that marks an example directory
pub const CONFIG_FILENAME: &str = "webpack.config.js";

/// CLI entry point, relative to the installed package
const BIN_PATH: &str = "bin/webpack.js";

/// Bundler-specific constants and output tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerProfile {
    pub package: String,
    pub config_filename: String,
    pub bin_path: PathBuf,
    pub patterns: OutputPatterns,
    pub replacements: Vec<Replacement>,
}

impl Default for BundlerProfile {
    fn default() -> Self {
        Self {
            package: BUNDLER_PACKAGE.to_string(),
            config_filename: CONFIG_FILENAME.to_string(),
            bin_path: PathBuf::from(BIN_PATH),
            patterns: OutputPatterns::default(),
            replacements: vec![
                Replacement::literal("node ", "node --no-warnings "),
                Replacement::literal("<insert local ip>", "127.0.0.1"),
                Replacement::whole_command(
                    "webpack-dev-server",
                    "node ../bin/webpack-dev-server.js",
                ),
            ],
        }
    }
}

impl BundlerProfile {
    /// Use a different output table, e.g. for a bundler major with new sentinels
    #[must_use]
    pub fn with_patterns(mut self, patterns: OutputPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Path of the bundler CLI inside an installed `node_modules`
    pub fn bin_in(&self, modules: &Path) -> PathBuf {
        modules.join(&self.package).join(&self.bin_path)
    }
}
