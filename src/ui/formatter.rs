//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the styled text; `display_*` functions print
//! it. Styling goes through `console`, which drops colors when the stream
//! is not a terminal.

use crate::cli::orchestration::ReleaseOutcome;
use console::style;
use std::fmt::Display;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_skipped(message: &str) -> String {
    format!("{} {}", style("-").dim(), style(message).dim())
}

/// A mutating step that dry-run mode suppressed
pub fn format_dry_run(message: &str) -> String {
    format!("{} would {}", style("[dry-run]").cyan(), message)
}

/// One-line summary naming the released version.
///
/// # Example
/// ```ignore
/// "✓ Released 1.2.4 (tag v1.2.4, pushed, published)"
/// ```
pub fn format_summary(outcome: &ReleaseOutcome) -> String {
    let mut details = vec![format!("tag {}", outcome.tag)];
    if outcome.tested {
        details.push("tested".to_string());
    }
    if outcome.pushed {
        details.push("pushed".to_string());
    }
    if outcome.published {
        details.push("published".to_string());
    }

    let headline = if outcome.dry_run {
        format!("Dry run complete: would release {}", style(&outcome.version).bold())
    } else {
        format!("Released {}", style(&outcome.version).green().bold())
    };

    format_success(&format!("{} ({})", headline, details.join(", ")))
}

/// Notice printed when a run stops on an error
pub fn format_aborted(error: &dyn Display) -> String {
    format!(
        "{}\n{}",
        style("Release aborted.").red().bold(),
        format_error(&error.to_string())
    )
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Format and print a warning to stderr.
pub fn display_warning(message: &str) {
    eprintln!("{}", format_warning(message));
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{}", format_success(message));
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{}", format_status(message));
}

pub fn display_skipped(message: &str) {
    println!("{}", format_skipped(message));
}

pub fn display_dry_run(message: &str) {
    println!("{}", format_dry_run(message));
}

pub fn display_release_summary(outcome: &ReleaseOutcome) {
    println!("\n{}", format_summary(outcome));
}

pub fn display_aborted(error: &dyn Display) {
    eprintln!("\n{}", format_aborted(error));
}
