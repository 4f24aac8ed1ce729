//! User interface module - progress reporting and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - [`Reporter`], which decides what gets printed

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_aborted, display_dry_run, display_error, display_release_summary, display_skipped,
    display_status, display_success, display_warning,
};

/// Prints the step-by-step trace of a release run.
///
/// Step, completion and skip notices only appear in verbose mode. Dry-run
/// notices and warnings are always shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Reporter { verbose }
    }

    /// Reporter that prints nothing but warnings and dry-run notices
    pub fn quiet() -> Self {
        Reporter { verbose: false }
    }

    /// A step is starting
    pub fn step(&self, message: &str) {
        if self.verbose {
            display_status(message);
        }
    }

    /// A step completed
    pub fn done(&self, message: &str) {
        if self.verbose {
            display_success(message);
        }
    }

    /// A step was skipped
    pub fn skipped(&self, message: &str) {
        if self.verbose {
            display_skipped(message);
        }
    }

    /// A mutating step suppressed by dry-run mode
    pub fn dry_run(&self, message: &str) {
        display_dry_run(message);
    }

    pub fn warn(&self, message: &str) {
        display_warning(message);
    }
}
