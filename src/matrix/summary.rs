//! End-of-run summary for a matrix

use console::style;

use super::{MatrixResults, PairResult, PairStatus};
use crate::orchestrator::PairReport;
use crate::ui::Logger;

const NAME_WIDTH: usize = 24;

/// Log the results per bundler, then an overall verdict
pub fn log_summary(results: &MatrixResults, logger: &Logger) {
    for (bundler, pairs) in results.bundlers() {
        logger.info(style(format!("Bundler {bundler}")).bold().underlined());

        if pairs.iter().all(|p| p.status.passed()) {
            logger.success(format_args!(
                "No issues detected running {} dependencies",
                pairs.len()
            ));
            logger.newline();
            continue;
        }

        for pair in pairs {
            logger.info(pair_block(pair));
        }
        logger.newline();
    }

    if results.has_failures() {
        logger.error("Compilation failures. Please review results above.");
    } else {
        logger.success("Compilations complete. No issues detected.");
    }
}

/// Status rows for one pair followed by its re-run command
fn pair_block(pair: &PairResult) -> String {
    let mut lines = vec![style(&pair.dependency).bold().to_string()];

    match &pair.status {
        PairStatus::Fatal(reason) => {
            lines.push(row("-", false));
            lines.extend(detail(reason));
        }
        PairStatus::Passed(report) | PairStatus::Failed(report) => {
            lines.extend(report_rows(report));
        }
    }

    lines.push(format!("  {}", style(&pair.rerun).dim()));
    lines.join("\n")
}

fn report_rows(report: &PairReport) -> Vec<String> {
    let mut lines = Vec::new();
    for example in &report.examples {
        lines.push(row(example.label(), example.passed()));
        if let Some(err) = &example.error {
            lines.extend(detail(&err.to_string()));
            if let Some(output) = err.output() {
                lines.extend(detail(output));
            }
        }
    }
    if let Some(tests) = &report.tests {
        lines.push(row(&format!("tests: {}", tests.command), tests.passed()));
        if let Some(err) = &tests.error {
            lines.extend(detail(&err.to_string()));
        }
    }
    lines
}

/// One Passed/Failed row per example, then the test stage if it ran
pub fn status_rows(report: &PairReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .examples
        .iter()
        .map(|example| row(example.label(), example.passed()))
        .collect();
    if let Some(tests) = &report.tests {
        lines.push(row(&format!("tests: {}", tests.command), tests.passed()));
    }
    lines
}

fn row(name: &str, passed: bool) -> String {
    let status = if passed {
        style("Passed").green()
    } else {
        style("Failed").red()
    };
    format!("  {name:<NAME_WIDTH$} {status}")
}

fn detail(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("  {:NAME_WIDTH$} {line}", ""))
}
