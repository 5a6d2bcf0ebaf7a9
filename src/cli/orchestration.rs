//! Release workflow orchestration
//!
//! A strictly linear pipeline: precondition checks first, then the mutations
//! (version file, build, commit, tag) and finally the optional publishing
//! steps. The first failure aborts the run. Side effects of steps that already
//! completed are left in place; there is no rollback.

use std::path::Path;

use crate::boundary::BoundaryWarning;
use crate::config::ToolsConfig;
use crate::domain::{ReleaseOptions, TargetVersion};
use crate::error::{ReleaseError, Result};
use crate::git::GitRepo;
use crate::process::Executor;
use crate::ui;
use crate::version_file::VersionFile;

/// Result of a successful release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The tag that was created
    pub tag: String,

    /// Whether commits and tags were pushed upstream
    pub pushed: bool,

    /// Whether the distributions were uploaded
    pub uploaded: bool,
}

/// Runs releases inside one repository.
///
/// All paths are resolved against `root`; the executor is expected to run
/// its commands there as well.
pub struct ReleaseWorkflow<'a, E: Executor> {
    executor: &'a E,
    root: &'a Path,
    tools: &'a ToolsConfig,
}

impl<'a, E: Executor> ReleaseWorkflow<'a, E> {
    pub fn new(executor: &'a E, root: &'a Path, tools: &'a ToolsConfig) -> Self {
        ReleaseWorkflow {
            executor,
            root,
            tools,
        }
    }

    /// Main release workflow
    ///
    /// 1. Validate the version string and the repository state
    /// 2. Rewrite the version declaration
    /// 3. Build the distributions
    /// 4. Commit and tag
    /// 5. Push and upload when requested
    pub fn run(&self, options: &ReleaseOptions) -> Result<ReleaseOutcome> {
        let target = TargetVersion::parse(options.version_string())?;
        let git = GitRepo::new(self.executor, self.tools.remote.as_str());
        let version_file = VersionFile::new(self.root, self.tools.build_config.as_str());

        tracing::info!(tag = %target, "starting release");

        self.check_preconditions(options, &target, &git, &version_file)?;

        self.update_version_file(&target, &version_file)?;
        self.build_distribution()?;
        self.create_release_commit(&target, &git, &version_file)?;

        let pushed = self.push(options, &git)?;
        let uploaded = self.upload(options)?;

        tracing::info!(tag = %target, pushed, uploaded, "release finished");

        Ok(ReleaseOutcome {
            tag: target.tag(),
            pushed,
            uploaded,
        })
    }

    fn check_preconditions(
        &self,
        options: &ReleaseOptions,
        target: &TargetVersion,
        git: &GitRepo<'_, E>,
        version_file: &VersionFile,
    ) -> Result<()> {
        let tag = target.tag();

        if options.should_upload() && !self.executor.is_available(&self.tools.publisher) {
            return Err(ReleaseError::domain(format!(
                "{} is not installed",
                self.tools.publisher
            )));
        }

        if let Some(required) = options.required_branch() {
            let current = git.current_branch()?;
            if current != required {
                return Err(ReleaseError::domain(format!(
                    "not on the {} branch. ({})",
                    required, current
                )));
            }
        }

        if !git.is_clean()? {
            return Err(ReleaseError::domain("uncommited files"));
        }

        if git.local_tags()?.contains(&tag) {
            return Err(ReleaseError::domain(format!(
                "tag already exists locally ({})",
                tag
            )));
        }

        if git.remote_tags()?.contains(&tag) {
            return Err(ReleaseError::domain(format!(
                "tag already exists remotely ({})",
                tag
            )));
        }

        if !version_file.exists() {
            return Err(ReleaseError::domain(format!(
                "missing {} file",
                version_file.relative()
            )));
        }

        let declared = version_file.read_declared_version(self.executor, &self.tools.python)?;
        if declared == target.version() {
            return Err(ReleaseError::domain("already the current version"));
        }

        tracing::debug!(%declared, requested = target.version(), "preconditions met");
        Ok(())
    }

    fn update_version_file(&self, target: &TargetVersion, version_file: &VersionFile) -> Result<()> {
        self.step(&format!("Updating {}...", version_file.relative()));

        let declarations = version_file.version_declarations()?;
        if !version_file.rewrite_version(target.version())? {
            return Err(ReleaseError::domain(format!(
                "failed to update {}",
                version_file.relative()
            )));
        }

        if declarations.len() > 1 {
            ui::display_boundary_warning(&BoundaryWarning::DuplicateVersionDeclarations {
                file: version_file.relative().to_string(),
                untouched: declarations[1..].to_vec(),
            });
        }
        Ok(())
    }

    fn build_distribution(&self) -> Result<()> {
        self.step("Building distribution...");

        let dist = self.root.join(&self.tools.dist_dir);
        match std::fs::remove_dir_all(&dist) {
            Ok(()) => tracing::debug!(path = %dist.display(), "removed previous build output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let python = self.tools.python.as_str();
        let build_config = self.tools.build_config.as_str();
        let result = self
            .executor
            .run(&[python, build_config, "sdist", "bdist_wheel"], false)?;
        if !result.success() {
            return Err(ReleaseError::domain("failed to build distribution"));
        }
        Ok(())
    }

    fn create_release_commit(
        &self,
        target: &TargetVersion,
        git: &GitRepo<'_, E>,
        version_file: &VersionFile,
    ) -> Result<()> {
        self.step("Create the release commit");
        git.add(version_file.relative())?;
        git.commit(&target.commit_message())?;

        self.step("Creating tag");
        git.create_annotated_tag(&target.tag(), &target.tag_message())?;
        Ok(())
    }

    fn push(&self, options: &ReleaseOptions, git: &GitRepo<'_, E>) -> Result<bool> {
        if !options.should_push() {
            self.step(ui::PUSH_REMINDER);
            return Ok(false);
        }

        self.step("Pushing to git upstream");
        git.push_follow_tags()?;
        Ok(true)
    }

    fn upload(&self, options: &ReleaseOptions) -> Result<bool> {
        if !options.should_upload() {
            return Ok(false);
        }

        self.step("Uploading to PyPI");
        let pattern = format!("{}/*", self.tools.dist_dir);
        self.executor
            .run(&[self.tools.publisher.as_str(), "upload", pattern.as_str()], true)?;
        Ok(true)
    }

    fn step(&self, title: &str) {
        tracing::info!(step = title.trim(), "release step");
        ui::display_title(title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutput, MockExecutor};

    fn repo_with_setup_py(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("setup.py"), content).unwrap();
        dir
    }

    fn declared(exec: &mut MockExecutor, version: &str) {
        exec.respond(&["python", "setup.py", "--version"], CommandOutput::ok(version));
    }

    #[test]
    fn test_leading_v_rejected_before_any_process() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let exec = MockExecutor::new();
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("v2.0").push(true).upload(true))
            .unwrap_err();

        assert_eq!(err.to_string(), "A version can't begin with a v");
        assert!(exec.calls().is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("setup.py")).unwrap(),
            "VERSION = '0.9'\n"
        );
    }

    #[test]
    fn test_full_pipeline_without_push_or_upload() {
        let dir = repo_with_setup_py("import x\nVERSION = '0.9'\nsetup()\n");
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        std::fs::write(dir.path().join("dist").join("old.whl"), "x").unwrap();

        let mut exec = MockExecutor::new();
        exec.respond(&["git", "show-ref"], CommandOutput::exit(1));
        declared(&mut exec, "0.9");
        let tools = ToolsConfig::default();

        let outcome = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap();

        assert_eq!(
            outcome,
            ReleaseOutcome {
                tag: "v1.0".to_string(),
                pushed: false,
                uploaded: false,
            }
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("setup.py")).unwrap(),
            "import x\nVERSION = '1.0'  # maintained by release tool\nsetup()\n"
        );
        assert!(!dir.path().join("dist").exists());

        let expected: Vec<Vec<&str>> = vec![
            vec!["git", "diff-index", "--quiet", "HEAD", "--"],
            vec!["git", "show-ref", "--tags"],
            vec!["git", "ls-remote", "--tags", "origin"],
            vec!["python", "setup.py", "--version"],
            vec!["python", "setup.py", "sdist", "bdist_wheel"],
            vec!["git", "add", "setup.py"],
            vec!["git", "commit", "-m", "Release v1.0"],
            vec!["git", "tag", "-a", "-m", "Release tag for v1.0", "v1.0"],
        ];
        assert_eq!(exec.calls(), expected);
    }

    #[test]
    fn test_push_and_upload() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.install("twine");
        declared(&mut exec, "0.9");
        let tools = ToolsConfig::default();

        let outcome = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").push(true).upload(true))
            .unwrap();

        assert!(outcome.pushed);
        assert!(outcome.uploaded);
        let calls = exec.calls();
        let n = calls.len();
        assert_eq!(calls[n - 2], vec!["git", "push", "--follow-tags"]);
        assert_eq!(calls[n - 1], vec!["twine", "upload", "dist/*"]);
    }

    #[test]
    fn test_upload_requires_publisher() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let exec = MockExecutor::new();
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").upload(true))
            .unwrap_err();

        assert_eq!(err.to_string(), "twine is not installed");
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_wrong_branch() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(&["git", "rev-parse"], CommandOutput::ok("feature"));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").only_on("main"))
            .unwrap_err();

        assert_eq!(err.to_string(), "not on the main branch. (feature)");
        assert!(!exec.was_called(&["git", "diff-index"]));
    }

    #[test]
    fn test_matching_branch_continues() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(&["git", "rev-parse"], CommandOutput::ok("main"));
        declared(&mut exec, "0.9");
        let tools = ToolsConfig::default();

        let outcome = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").only_on("main"));
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_dirty_tree_creates_nothing() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(&["git", "diff-index"], CommandOutput::exit(1));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").push(true))
            .unwrap_err();

        assert_eq!(err.to_string(), "uncommited files");
        assert!(!exec.was_called(&["git", "commit"]));
        assert!(!exec.was_called(&["git", "tag"]));
        assert!(!exec.was_called(&["git", "push"]));
    }

    #[test]
    fn test_local_tag_blocks_release() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(&["git", "show-ref"], CommandOutput::ok("abc refs/tags/v1.0"));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "tag already exists locally (v1.0)");
        assert!(!exec.was_called(&["git", "ls-remote"]));
    }

    #[test]
    fn test_remote_tag_blocks_release() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(
            &["git", "ls-remote"],
            CommandOutput::ok("abc\trefs/tags/v1.0\nabd\trefs/tags/v1.0^{}"),
        );
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "tag already exists remotely (v1.0)");
        assert!(!exec.was_called(&["python"]));
    }

    #[test]
    fn test_unreachable_remote_is_process_failure() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.respond(&["git", "ls-remote"], CommandOutput::exit(128));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();
        assert!(err.is_process_failure());
    }

    #[test]
    fn test_missing_build_config() {
        let dir = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "missing setup.py file");
        assert!(exec.was_called(&["git", "ls-remote"]));
        assert!(!exec.was_called(&["python"]));
    }

    #[test]
    fn test_already_current_version() {
        let dir = repo_with_setup_py("VERSION = '1.0'\n");
        let mut exec = MockExecutor::new();
        declared(&mut exec, "1.0");
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "already the current version");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("setup.py")).unwrap(),
            "VERSION = '1.0'\n"
        );
    }

    #[test]
    fn test_no_version_declaration() {
        let dir = repo_with_setup_py("setup(version='0.9')\n");
        let mut exec = MockExecutor::new();
        declared(&mut exec, "0.9");
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to update setup.py");
        assert!(!exec.was_called(&["python", "setup.py", "sdist"]));
    }

    #[test]
    fn test_build_failure_stops_before_commit() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        declared(&mut exec, "0.9");
        exec.respond(&["python", "setup.py", "sdist"], CommandOutput::exit(1));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0"))
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to build distribution");
        assert!(!exec.was_called(&["git", "add"]));
        // No rollback: the version file stays rewritten
        assert!(std::fs::read_to_string(dir.path().join("setup.py"))
            .unwrap()
            .contains("'1.0'"));
    }

    #[test]
    fn test_push_failure_leaves_tag_in_place() {
        let dir = repo_with_setup_py("VERSION = '0.9'\n");
        let mut exec = MockExecutor::new();
        exec.install("twine");
        declared(&mut exec, "0.9");
        exec.respond(&["git", "push"], CommandOutput::exit(1));
        let tools = ToolsConfig::default();

        let err = ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("1.0").push(true).upload(true))
            .unwrap_err();

        assert!(err.is_process_failure());
        assert!(exec.was_called(&["git", "tag", "-a"]));
        assert!(!exec.was_called(&["twine"]));
    }

    #[test]
    fn test_custom_tools() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg/setup.py"), "VERSION = '0.1'\n").unwrap();

        let mut exec = MockExecutor::new();
        exec.install("flit");
        exec.respond(&["python3", "pkg/setup.py", "--version"], CommandOutput::ok("0.1"));
        let tools = ToolsConfig {
            python: "python3".to_string(),
            publisher: "flit".to_string(),
            build_config: "pkg/setup.py".to_string(),
            dist_dir: "out".to_string(),
            remote: "upstream".to_string(),
        };

        ReleaseWorkflow::new(&exec, dir.path(), &tools)
            .run(&ReleaseOptions::new("0.2").upload(true))
            .unwrap();

        assert!(exec.was_called(&["git", "ls-remote", "--tags", "upstream"]));
        assert!(exec.was_called(&["python3", "pkg/setup.py", "sdist", "bdist_wheel"]));
        assert!(exec.was_called(&["git", "add", "pkg/setup.py"]));
        assert!(exec.was_called(&["flit", "upload", "out/*"]));
    }
}
