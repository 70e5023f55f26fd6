//! Console output formatting.
//!
//! Provides a single interface for all console output: colored status lines
//! with a timestamp prefix. The formatter is constructed once and passed to
//! the operations that report progress, so there is no process-wide logger
//! state to configure.

use chrono::Local;
use colored::*;

/// Formats console output with consistent styling.
///
/// Construct one and pass it by reference to operations that log. The
/// `quiet` flag suppresses everything except errors, which tests use to
/// keep their output clean.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    /// Creates a formatter that prints all messages.
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Creates a formatter that only prints errors.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {} {}", Self::timestamp().dimmed(), "✓".green(), message);
        }
    }

    /// Prints an error message in red with an X mark.
    pub fn error(&self, message: &str) {
        eprintln!("{} {} {}", Self::timestamp().dimmed(), "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!(
                "{} {} {}",
                Self::timestamp().dimmed(),
                "⚠".yellow(),
                message
            );
        }
    }

    /// Prints an informational message in cyan.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", Self::timestamp().dimmed(), message.cyan());
        }
    }

    /// Prints a source → destination move line.
    pub fn moved(&self, source: &std::path::Path, dest: &std::path::Path) {
        if !self.quiet {
            println!(
                "{}   {} -> {}",
                Self::timestamp().dimmed(),
                source.display(),
                dest.display()
            );
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}
