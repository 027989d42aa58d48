//! Matrix command: every pair in a config file

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::MatrixArgs;
use crate::commands::helpers::{PairSettings, run_pair, working_root};
use crate::config::MatrixConfig;
use crate::error::{CanaryError, Result};
use crate::matrix::{self, log_summary};
use crate::ui::{self, LogLevel, Logger};

/// Run the matrix and print the summary
///
/// Pair logs are silent unless a level is given on the command line or in
/// the config; the summary is always shown.
pub fn run(root: Option<PathBuf>, log_level: Option<LogLevel>, args: MatrixArgs) -> Result<()> {
    let config = MatrixConfig::load(&args.config)?;
    let root = working_root(root)?;

    let pair_logger = log_level
        .or(config.log_level)
        .map_or_else(Logger::silent, Logger::new);
    let summary_logger = Logger::new(LogLevel::Info);

    let run_list = matrix::create_run_list(&config);
    let mut progress = ui::progress_for(&pair_logger, run_list.len());
    let started = Instant::now();

    let results = matrix::run_matrix(&run_list, progress.as_mut(), |item| {
        let settings = PairSettings {
            root: root.clone(),
            package_manager: item.package_manager,
            example_dirs: item.example_dirs(),
            example_timeout: config.example_timeout(),
            install_timeout: item.entry.timeout_or(config.install_timeout()),
            test: item.entry.test.clone(),
            open_url_command: config.open_url_command.clone(),
            output_patterns: item.output_patterns.cloned(),
        };
        run_pair(&settings, &pair_logger, item.bundler, item.dependency())
    });

    log_summary(&results, &summary_logger);
    summary_logger.debug(format_args!(
        "Matrix finished ({}ms)",
        started.elapsed().as_millis()
    ));

    let failed = results
        .bundlers()
        .flat_map(|(_, pairs)| pairs)
        .filter(|pair| !pair.status.passed())
        .count();
    if failed > 0 {
        return Err(CanaryError::PairsFailed {
            failed,
            total: results.pair_count(),
        });
    }
    Ok(())
}
