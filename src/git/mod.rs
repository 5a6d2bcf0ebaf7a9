//! Git operations used by the release workflow
//!
//! [GitRepo] wraps an [Executor] and speaks to the system `git` binary. It
//! covers the read-only inspection queries (branch, tags, cleanliness) and the
//! handful of mutations a release performs (add, commit, tag, push).
//!
//! Nothing is cached: every call takes a fresh snapshot of the repository.

use crate::domain::TagSet;
use crate::error::Result;
use crate::process::Executor;

/// Git front-end bound to one repository through an executor
pub struct GitRepo<'a, E: Executor> {
    executor: &'a E,
    remote: String,
}

impl<'a, E: Executor> GitRepo<'a, E> {
    /// # Arguments
    /// * `executor` - Executor rooted at the repository working tree
    /// * `remote` - Remote consulted for remote tags (normally "origin")
    pub fn new(executor: &'a E, remote: impl Into<String>) -> Self {
        GitRepo {
            executor,
            remote: remote.into(),
        }
    }

    /// Name of the checked-out branch.
    ///
    /// Fails with a process failure outside a git working tree.
    pub fn current_branch(&self) -> Result<String> {
        let out = self
            .executor
            .capture(&["git", "rev-parse", "--abbrev-ref", "HEAD"], true)?;
        Ok(out.stdout)
    }

    /// Tags present in the local repository.
    ///
    /// `git show-ref --tags` exits non-zero when there are no tags at all,
    /// which is read as an empty set.
    pub fn local_tags(&self) -> Result<TagSet> {
        let out = self.executor.capture(&["git", "show-ref", "--tags"], false)?;
        Ok(TagSet::from_ref_listing(&out.stdout))
    }

    /// Tags present on the configured remote. Requires the remote to be reachable.
    pub fn remote_tags(&self) -> Result<TagSet> {
        let out = self
            .executor
            .capture(&["git", "ls-remote", "--tags", self.remote.as_str()], true)?;
        Ok(TagSet::from_ref_listing(&out.stdout))
    }

    /// True iff tracked files have no changes relative to HEAD
    pub fn is_clean(&self) -> Result<bool> {
        let out = self
            .executor
            .capture(&["git", "diff-index", "--quiet", "HEAD", "--"], false)?;
        Ok(out.success())
    }

    pub fn add(&self, path: &str) -> Result<()> {
        self.executor.run(&["git", "add", path], true)?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.executor.run(&["git", "commit", "-m", message], true)?;
        Ok(())
    }

    /// Create an annotated tag on HEAD
    pub fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.executor
            .run(&["git", "tag", "-a", "-m", message, name], true)?;
        Ok(())
    }

    /// Push the current branch together with the tags reachable from it
    pub fn push_follow_tags(&self) -> Result<()> {
        self.executor.run(&["git", "push", "--follow-tags"], true)?;
        Ok(())
    }
}
