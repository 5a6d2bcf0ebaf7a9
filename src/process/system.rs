use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, Executor};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Spawns real child processes with the repository root as working directory
pub struct SystemExecutor {
    root: PathBuf,
}

impl SystemExecutor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SystemExecutor { root: root.into() }
    }

    fn command(&self, argv: &[&str]) -> Result<Command> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ReleaseError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command line",
            ))
        })?;

        tracing::debug!(argv = ?argv, cwd = %self.root.display(), "spawning");

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.root);
        Ok(cmd)
    }

    fn finish(argv: &[&str], code: Option<i32>, stdout: String, check: bool) -> Result<CommandOutput> {
        tracing::debug!(argv = ?argv, code = ?code, "finished");

        if check && code != Some(0) {
            return Err(ReleaseError::process_failed(argv, code));
        }

        Ok(CommandOutput { code, stdout })
    }
}

fn spawn_error(argv: &[&str], source: std::io::Error) -> ReleaseError {
    ReleaseError::ToolMissing {
        program: argv.first().copied().unwrap_or_default().to_string(),
        source,
    }
}

impl Executor for SystemExecutor {
    fn capture(&self, argv: &[&str], check: bool) -> Result<CommandOutput> {
        let output = self
            .command(argv)?
            .stdout(Stdio::piped())
            .output()
            .map_err(|e| spawn_error(argv, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Self::finish(argv, output.status.code(), stdout, check)
    }

    fn run(&self, argv: &[&str], check: bool) -> Result<CommandOutput> {
        let status = self
            .command(argv)?
            .status()
            .map_err(|e| spawn_error(argv, e))?;

        Self::finish(argv, status.code(), String::new(), check)
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
