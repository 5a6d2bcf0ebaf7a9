//! Reading and rewriting the version declared in the build-config file.
//!
//! The declared version is asked of the build tool itself; rewriting is a
//! line-level edit of the `VERSION = ...` assignment.

use crate::error::Result;
use crate::process::Executor;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^VERSION\s*=").expect("version pattern is valid"));

/// Comment appended to every rewritten declaration
pub const MAINTAINED_MARKER: &str = "# maintained by release tool";

/// Canonical declaration line, without line terminator
pub fn version_line(version: &str) -> String {
    format!("VERSION = '{}'  {}", version, MAINTAINED_MARKER)
}

/// 1-based numbers of every line declaring `VERSION`
pub fn find_version_declarations(text: &str) -> Vec<usize> {
    text.split_inclusive('\n')
        .enumerate()
        .filter(|(_, line)| VERSION_ASSIGNMENT.is_match(line))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Rewrites the first `VERSION =` line of `text` to declare `version`.
///
/// Every other line, including later `VERSION =` lines, is reproduced
/// byte for byte and in order. The rewritten line keeps its own line ending.
///
/// # Returns
/// `(new_text, changed)` where `changed` is false when no line matched
pub fn rewrite_version_text(text: &str, version: &str) -> (String, bool) {
    let mut out = String::with_capacity(text.len() + 64);
    let mut changed = false;

    for line in text.split_inclusive('\n') {
        if !changed && VERSION_ASSIGNMENT.is_match(line) {
            let body = line.trim_end_matches(['\n', '\r']);
            out.push_str(&version_line(version));
            out.push_str(&line[body.len()..]);
            changed = true;
        } else {
            out.push_str(line);
        }
    }

    (out, changed)
}

/// The project's build-config file (e.g. `setup.py`) inside a repository
pub struct VersionFile {
    path: PathBuf,
    relative: String,
}

impl VersionFile {
    /// # Arguments
    /// * `root` - Repository root
    /// * `relative` - File name relative to `root`, as handed to the build tool and git
    pub fn new(root: &Path, relative: impl Into<String>) -> Self {
        let relative = relative.into();
        VersionFile {
            path: root.join(&relative),
            relative,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// 1-based line numbers of every `VERSION =` line in the file
    pub fn version_declarations(&self) -> Result<Vec<usize>> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(find_version_declarations(&text))
    }

    /// Asks the build tool for the version it currently declares, e.g.
    /// `python setup.py --version`.
    pub fn read_declared_version<E: Executor>(&self, executor: &E, python: &str) -> Result<String> {
        let out = executor.capture(&[python, self.relative.as_str(), "--version"], true)?;
        Ok(out.stdout)
    }

    /// Rewrites the declaration in place.
    ///
    /// The new content is written to a sibling temporary file and renamed over
    /// the original, so readers never observe a half-written file.
    ///
    /// # Returns
    /// * `Ok(true)` - A declaration was rewritten
    /// * `Ok(false)` - No `VERSION =` line exists; the file is left untouched
    pub fn rewrite_version(&self, version: &str) -> Result<bool> {
        let text = std::fs::read_to_string(&self.path)?;
        let (new_text, changed) = rewrite_version_text(&text, version);
        if !changed {
            return Ok(false);
        }

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(new_text.as_bytes())?;
        tmp.as_file().sync_all()?;

        let permissions = std::fs::metadata(&self.path)?.permissions();
        std::fs::set_permissions(tmp.path(), permissions)?;

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(true)
    }

    /// Path relative to the repository root
    pub fn relative(&self) -> &str {
        &self.relative
    }
}
