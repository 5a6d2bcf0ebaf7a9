use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, Executor};
use std::cell::RefCell;
use std::collections::HashSet;

/// Mock executor for testing without spawning processes.
///
/// Results are scripted by argv prefix; the most recently registered matching
/// prefix wins. Unscripted commands succeed with empty output. Every call is
/// recorded in order.
#[derive(Default)]
pub struct MockExecutor {
    responses: Vec<(Vec<String>, CommandOutput)>,
    missing: HashSet<String>,
    available: HashSet<String>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl MockExecutor {
    /// Create a new mock where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for commands starting with `prefix`
    pub fn respond(&mut self, prefix: &[&str], output: CommandOutput) -> &mut Self {
        self.responses
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    /// Make spawning `program` fail as if it were not installed
    pub fn missing_tool(&mut self, program: &str) -> &mut Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Mark `program` as present on the execution path
    pub fn install(&mut self, program: &str) -> &mut Self {
        self.available.insert(program.to_string());
        self
    }

    /// Every argv run so far, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded call starts with `prefix`
    pub fn was_called(&self, prefix: &[&str]) -> bool {
        self.calls.borrow().iter().any(|call| starts_with(call, prefix))
    }

    fn dispatch(&self, argv: &[&str], check: bool) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(argv.iter().map(|s| s.to_string()).collect());

        let program = argv.first().copied().unwrap_or_default();
        if self.missing.contains(program) {
            return Err(ReleaseError::ToolMissing {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }

        let output = self
            .responses
            .iter()
            .rev()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                starts_with_str(argv, &prefix)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));

        if check && !output.success() {
            return Err(ReleaseError::process_failed(argv, output.code));
        }
        Ok(output)
    }
}

fn starts_with(call: &[String], prefix: &[&str]) -> bool {
    call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b)
}

fn starts_with_str(argv: &[&str], prefix: &[&str]) -> bool {
    argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, b)| a == b)
}

impl Executor for MockExecutor {
    fn capture(&self, argv: &[&str], check: bool) -> Result<CommandOutput> {
        self.dispatch(argv, check)
    }

    fn run(&self, argv: &[&str], check: bool) -> Result<CommandOutput> {
        self.dispatch(argv, check).map(|out| CommandOutput {
            code: out.code,
            stdout: String::new(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}
