//! Leveled console logger
//!
//! One `Logger` is created per command invocation and passed by reference to
//! everything that reports progress. Levels are ordered; a logger prints a
//! message when the message's level is at or above its own.

use std::fmt::Display;
#[cfg(test)]
use std::sync::Mutex;

use clap::ValueEnum;
use console::{Style, Term};
use serde::Deserialize;

/// Log verbosity, from most to least chatty
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Success,
    Warn,
    Error,
    Silent,
}

#[derive(Debug)]
enum Sink {
    Term(Term),
    #[cfg(test)]
    Memory(Mutex<Vec<String>>),
}

/// Leveled, styled console output
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    sink: Sink,
}

impl Logger {
    /// Logger writing to stdout
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            sink: Sink::Term(Term::stdout()),
        }
    }

    /// Logger that prints nothing
    pub fn silent() -> Self {
        Self::new(LogLevel::Silent)
    }

    /// Logger that records lines in memory, for assertions
    #[cfg(test)]
    pub fn capture(level: LogLevel) -> Self {
        Self {
            level,
            sink: Sink::Memory(Mutex::new(Vec::new())),
        }
    }

    /// Lines recorded by a capturing logger
    #[cfg(test)]
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Term(_) => Vec::new(),
        }
    }

    #[allow(dead_code)] // used in tests
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message at `level` would be printed
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level != LogLevel::Silent && level >= self.level
    }

    pub fn debug(&self, message: impl Display) {
        if self.enabled(LogLevel::Debug) {
            self.write(&format!(
                "{} {message}",
                Style::new().dim().apply_to("[DEBUG]")
            ));
        }
    }

    pub fn info(&self, message: impl Display) {
        if self.enabled(LogLevel::Info) {
            self.write(message.to_string().trim_end());
        }
    }

    /// Blank line, shown at info level
    pub fn newline(&self) {
        if self.enabled(LogLevel::Info) {
            self.write("");
        }
    }

    pub fn success(&self, message: impl Display) {
        if self.enabled(LogLevel::Success) {
            self.write(&styled_block(&message.to_string(), &Style::new().green()));
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.enabled(LogLevel::Warn) {
            self.write(&styled_block(&message.to_string(), &Style::new().yellow()));
        }
    }

    pub fn error(&self, message: impl Display) {
        if self.enabled(LogLevel::Error) {
            self.write(&styled_block(&message.to_string(), &Style::new().red()));
        }
    }

    fn write(&self, line: &str) {
        match &self.sink {
            Sink::Term(term) => {
                let _ = term.write_line(line);
            }
            #[cfg(test)]
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(console::strip_ansi_codes(line).into_owned());
                }
            }
        }
    }
}

/// First line bold in `style`, remaining lines plain `style`
fn styled_block(message: &str, style: &Style) -> String {
    let message = message.trim();
    let mut lines = message.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };

    let mut block = style.clone().bold().apply_to(first).to_string();
    for line in lines {
        block.push('\n');
        block.push_str(&style.apply_to(line).to_string());
    }
    block
}
