//! Canary - bundler compatibility checks
//!
//! Installs a bundler version next to a dependency, runs the examples the
//! dependency ships with that bundler and reports which of them break.

use clap::Parser;

mod bundler;
mod cli;
mod commands;
mod config;
mod dependency_tests;
mod discovery;
mod error;
mod installer;
mod matrix;
mod orchestrator;
mod reference;
mod runner;
mod ui;
mod workspace;

use cli::{Cli, Commands};
use ui::LogLevel;

fn main() {
    let cli = Cli::parse();
    let run_level = cli.pair_log_level(LogLevel::Info);
    let matrix_level = cli.matrix_log_level();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(cli.root, run_level, args),
        Commands::Matrix(args) => commands::matrix::run(cli.root, matrix_level, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
