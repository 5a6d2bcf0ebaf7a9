use std::fmt;

/// Non-fatal conditions noticed while releasing.
/// The release carries on; these are only reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The build-config file declares VERSION more than once; only the
    /// first declaration was rewritten
    DuplicateVersionDeclarations { file: String, untouched: Vec<usize> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DuplicateVersionDeclarations { file, untouched } => {
                let lines: Vec<String> = untouched.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "{} declares VERSION more than once; line(s) {} left unchanged",
                    file,
                    lines.join(", ")
                )
            }
        }
    }
}
