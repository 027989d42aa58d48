//! Example command resolution
//!
//! An example may document how it is meant to be run in a README next to its
//! config file. The first line of the first fenced code block is used as the
//! command, after a fixed list of rewrites. Without one, the bundler binary is
//! run against the discovered config.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// README file looked up next to the example config
pub const README_FILENAME: &str = "README.md";

const FENCE: &str = "```";

/// A textual rewrite applied to a README command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Replace the first occurrence of `from`
    Literal { from: String, to: String },
    /// Replace the command only when it equals `from` exactly
    WholeCommand { from: String, to: String },
}

impl Replacement {
    pub fn literal(from: &str, to: &str) -> Self {
        Replacement::Literal {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn whole_command(from: &str, to: &str) -> Self {
        Replacement::WholeCommand {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn apply(&self, command: String) -> String {
        match self {
            Replacement::Literal { from, to } => command.replacen(from.as_str(), to, 1),
            Replacement::WholeCommand { from, to } => {
                if command == *from {
                    to.clone()
                } else {
                    command
                }
            }
        }
    }
}

/// Apply each replacement in order
pub fn apply_replacements(command: &str, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .fold(command.to_string(), |command, replacement| {
            replacement.apply(command)
        })
}

/// Extract the command line from a README's first fenced code block
///
/// The line right after the opening fence (which may carry a language tag)
/// is skipped; the next line is the command. Blocks too short to hold a
/// command line, or whose command line is blank, yield `None`.
pub fn command_from_readme(readme: &str) -> Option<String> {
    let start = readme.find(FENCE)? + FENCE.len();
    let end = start + readme[start..].find(FENCE)?;
    let lines: Vec<&str> = readme[start..end].split('\n').collect();

    if lines.len() < 3 {
        return None;
    }

    let command = lines[1].trim();
    if command.is_empty() {
        None
    } else {
        Some(command.to_string())
    }
}

/// A program, its arguments and the directory to run it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ExampleCommand {
    /// Split a command line on whitespace; `None` when it is blank
    pub fn parse(command_line: &str, cwd: &Path) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            cwd: cwd.to_path_buf(),
        })
    }

    /// Decide how to run the example whose config lives at `config_path`
    pub fn for_example(
        config_path: &Path,
        bundler_bin: &Path,
        replacements: &[Replacement],
    ) -> Self {
        let example_dir = config_path.parent().unwrap_or(Path::new("."));

        fs::read_to_string(example_dir.join(README_FILENAME))
            .ok()
            .and_then(|readme| command_from_readme(&readme))
            .map(|command| apply_replacements(&command, replacements))
            .and_then(|command| Self::parse(&command, example_dir))
            .unwrap_or_else(|| Self {
                program: bundler_bin.to_string_lossy().into_owned(),
                args: vec![
                    "--config".to_string(),
                    config_path.to_string_lossy().into_owned(),
                ],
                cwd: example_dir.to_path_buf(),
            })
    }
}

impl fmt::Display for ExampleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
