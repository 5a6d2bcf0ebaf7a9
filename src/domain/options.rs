/// Options for one release invocation.
///
/// Built once from parsed arguments and never mutated afterwards. The
/// version string is kept as typed; its format is checked by the release
/// workflow before anything else runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    version_string: String,
    only_on: Option<String>,
    push: bool,
    upload: bool,
}

impl ReleaseOptions {
    pub fn new(version_string: impl Into<String>) -> Self {
        ReleaseOptions {
            version_string: version_string.into(),
            only_on: None,
            push: false,
            upload: false,
        }
    }

    /// Only allow the release from this branch
    pub fn only_on(mut self, branch: impl Into<String>) -> Self {
        self.only_on = Some(branch.into());
        self
    }

    pub fn push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    pub fn required_branch(&self) -> Option<&str> {
        self.only_on.as_deref()
    }

    pub fn should_push(&self) -> bool {
        self.push
    }

    pub fn should_upload(&self) -> bool {
        self.upload
    }
}
