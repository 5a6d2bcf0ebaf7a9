use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A precondition of the release was violated (dirty tree, duplicate tag, ...)
    #[error("{0}")]
    Domain(String),

    /// An external tool ran but did not exit successfully
    #[error("command '{}' {}", .argv.join(" "), describe_exit(.code))]
    ProcessFailed { argv: Vec<String>, code: Option<i32> },

    /// An external tool could not be spawned at all
    #[error("cannot run '{program}': {source}")]
    ToolMissing {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pyrelease
pub type Result<T> = std::result::Result<T, ReleaseError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("returned non-zero exit status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl ReleaseError {
    /// Create a domain (precondition) error
    pub fn domain(msg: impl Into<String>) -> Self {
        ReleaseError::Domain(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a process failure for the given argv
    pub fn process_failed<S: AsRef<str>>(argv: &[S], code: Option<i32>) -> Self {
        ReleaseError::ProcessFailed {
            argv: argv.iter().map(|s| s.as_ref().to_string()).collect(),
            code,
        }
    }

    /// True for failures raised by the release checks themselves
    pub fn is_domain(&self) -> bool {
        matches!(self, ReleaseError::Domain(_))
    }

    /// True when an external tool failed or was absent
    pub fn is_process_failure(&self) -> bool {
        matches!(
            self,
            ReleaseError::ProcessFailed { .. } | ReleaseError::ToolMissing { .. }
        )
    }
}
