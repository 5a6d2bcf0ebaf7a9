//! User-facing output: progress banners, fatal errors and warnings.
//!
//! - `formatter` - Pure string formatting, unit tested
//! - This module - Writes to the terminal

pub mod formatter;

use console::style;

use crate::boundary::BoundaryWarning;

pub use formatter::{format_fatal, format_title, PUSH_REMINDER};

/// Print a progress banner before a pipeline step.
pub fn display_title(message: &str) {
    println!("{}", style(format_title(message)).bold());
}

/// Print the single fatal-error line on stderr.
pub fn display_fatal(message: &dyn std::fmt::Display) {
    eprintln!("{}", style(format_fatal(message)).red().for_stderr());
}

/// Report a non-fatal warning on stderr.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    tracing::warn!(%warning, "boundary warning");
    eprintln!(
        "{} {}",
        style("⚠ WARNING:").yellow().for_stderr(),
        warning
    );
}
