//! External process abstraction layer
//!
//! Every tool the release pipeline talks to (git, the project's build tool,
//! the package publisher) is reached through the [Executor] trait, so the
//! pipeline can run against a real working tree or a scripted mock.
//!
//! - [system::SystemExecutor]: spawns real child processes rooted at a
//!   repository directory
//! - [mock::MockExecutor]: records calls and replays scripted results

pub mod mock;
pub mod system;

pub use mock::MockExecutor;
pub use system::SystemExecutor;

use crate::error::Result;

/// Result of a finished child process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
    /// Captured stdout, trimmed of surrounding whitespace. Empty for
    /// pass-through invocations.
    pub stdout: String,
}

impl CommandOutput {
    /// A successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(0),
            stdout: stdout.into().trim().to_string(),
        }
    }

    /// A run that exited with `code` and produced no output
    pub fn exit(code: i32) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external tools on behalf of the release pipeline.
///
/// With `check` set, a non-zero exit is turned into
/// [crate::error::ReleaseError::ProcessFailed]. A tool that cannot be spawned
/// always fails with [crate::error::ReleaseError::ToolMissing].
pub trait Executor {
    /// Run `argv` and capture its stdout. Stderr still reaches the terminal.
    fn capture(&self, argv: &[&str], check: bool) -> Result<CommandOutput>;

    /// Run `argv` letting all of its output pass through to the terminal.
    fn run(&self, argv: &[&str], check: bool) -> Result<CommandOutput>;

    /// Whether `program` can be found on the execution path
    fn is_available(&self, program: &str) -> bool;
}
