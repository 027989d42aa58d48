//! Run command: one bundler and dependency pair

use std::path::PathBuf;
use std::time::Duration;

use console::style;

use crate::cli::RunArgs;
use crate::commands::helpers::{PairSettings, run_pair, working_root};
use crate::discovery;
use crate::error::Result;
use crate::matrix::status_rows;
use crate::orchestrator::PairReport;
use crate::ui::{LogLevel, Logger};

/// Run the pair and log the verdict
pub fn run(root: Option<PathBuf>, log_level: LogLevel, args: RunArgs) -> Result<()> {
    let logger = Logger::new(log_level);
    logger.debug(format_args!(
        "To re-run: {}",
        style(rerun_command(&args)).bold()
    ));

    let settings = PairSettings {
        root: working_root(root)?,
        package_manager: args.package_manager,
        example_dirs: example_dirs(&args),
        example_timeout: Duration::from_millis(args.timeout),
        install_timeout: Duration::from_millis(args.install_timeout),
        test: args.test.clone(),
        open_url_command: args.open_url_command.clone(),
        output_patterns: None,
    };

    let outcome = run_pair(&settings, &logger, &args.bundler, &args.dependency);
    log_verdict(&logger, outcome)
}

/// Log the pair's verdict, listing every example when some of them failed
fn log_verdict(logger: &Logger, outcome: Result<PairReport>) -> Result<()> {
    match outcome {
        Ok(_) => {
            logger.success("All test cases passed");
            Ok(())
        }
        Err(err) => {
            if let Some(report) = err.report() {
                logger.newline();
                for line in status_rows(report) {
                    logger.info(line);
                }
            }
            logger.error("Errors have occurred running examples");
            Err(err)
        }
    }
}

fn example_dirs(args: &RunArgs) -> Vec<String> {
    if args.no_examples {
        Vec::new()
    } else if args.example_dirs.is_empty() {
        discovery::default_example_dirs()
    } else {
        args.example_dirs.clone()
    }
}

fn rerun_command(args: &RunArgs) -> String {
    format!(
        "canary run --bundler {} --dependency {} --package-manager {}",
        args.bundler, args.dependency, args.package_manager
    )
}
