//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - run: single pair arguments
//! - matrix: matrix run arguments
//! - completions: completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ui::LogLevel;

pub mod completions;
pub mod matrix;
pub mod run;

pub use completions::CompletionsArgs;
pub use matrix::MatrixArgs;
pub use run::RunArgs;

/// Canary - bundler compatibility checks
///
/// Install a bundler next to a dependency and run the dependency's examples with it.
#[derive(Parser, Debug)]
#[command(
    name = "canary",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Check that a dependency's examples still build with a bundler version",
    long_about = "Canary installs a bundler version and a dependency (loader, plugin, dev server) \
                  side by side, runs every example the dependency ships with that bundler and \
                  reports which examples fail.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  canary run -b 4.1.0 -d css-loader@1.0.0                 \x1b[90m# Registry versions\x1b[0m\n   \
                  canary run -b 4.1.0 -d webpack-contrib/css-loader#master \x1b[90m# GitHub branch\x1b[0m\n   \
                  canary run -b 4.1.0 -d css-loader --test \"npm test\"      \x1b[90m# Also run its tests\x1b[0m\n   \
                  canary matrix --config canary.yaml                      \x1b[90m# Every pair in a config\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Directory packages are installed into
    #[arg(long, global = true, value_name = "DIR", env = "CANARY_ROOT")]
    pub root: Option<PathBuf>,

    /// Log level for pair runs
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose output (debug logs, no progress bar)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level for pair logs: `--verbose`, then `--log-level`, then `fallback`
    pub fn pair_log_level(&self, fallback: LogLevel) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level.unwrap_or(fallback)
        }
    }

    /// Level for matrix pair logs when given on the command line; `None`
    /// leaves the choice to the config file
    pub fn matrix_log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else {
            self.log_level
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one bundler and dependency pair
    Run(RunArgs),

    /// Run every pair listed in a matrix config
    Matrix(MatrixArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
