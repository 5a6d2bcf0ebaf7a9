use crate::error::{ReleaseError, Result};
use std::fmt;

/// The version being released, paired with its tag name.
///
/// The bare version (e.g. "1.2.0") goes into the build-config file, the tag
/// (e.g. "v1.2.0") names the git tag and release commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetVersion {
    version: String,
}

impl TargetVersion {
    /// Parses a bare version string.
    ///
    /// # Returns
    /// * `Ok(TargetVersion)` - The target version
    /// * `Err` - If the string starts with "v"
    ///
    /// # Example
    /// ```
    /// # use pyrelease::domain::TargetVersion;
    /// let target = TargetVersion::parse("1.0").unwrap();
    /// assert_eq!(target.tag(), "v1.0");
    /// assert!(TargetVersion::parse("v1.0").is_err());
    /// ```
    pub fn parse(version_string: &str) -> Result<Self> {
        if version_string.starts_with('v') {
            return Err(ReleaseError::domain("A version can't begin with a v"));
        }

        Ok(TargetVersion {
            version: version_string.to_string(),
        })
    }

    /// The version as written into the build-config file
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The tag name, `v{version}`
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    pub fn commit_message(&self) -> String {
        format!("Release {}", self.tag())
    }

    pub fn tag_message(&self) -> String {
        format!("Release tag for {}", self.tag())
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
