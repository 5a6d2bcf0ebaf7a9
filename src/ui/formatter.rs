//! Pure formatting functions for UI output.

use std::fmt::Display;

/// Banner shown when the release was not pushed
pub const PUSH_REMINDER: &str = "Don't forget to push:\n  git push --follow-tags\n";

/// Progress banner, `\n🍄  {message}\n`
pub fn format_title(message: &str) -> String {
    format!("\n🍄  {}\n", message)
}

/// Fatal error line, `\n💥  Fatal: {message}\n`
pub fn format_fatal(message: &dyn Display) -> String {
    format!("\n💥  Fatal: {}\n", message)
}
