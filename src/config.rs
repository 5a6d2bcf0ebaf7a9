use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Name of the per-repository configuration file
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Complete configuration for a release run.
///
/// Every field has a default, so an empty file (or no file) gives the stock
/// Python-package behaviour.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// External tools and paths used by the release workflow
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    /// Interpreter that runs the build-config file
    #[serde(default = "default_python")]
    pub python: String,

    /// Package upload tool
    #[serde(default = "default_publisher")]
    pub publisher: String,

    /// Build-config file holding the VERSION declaration, relative to the repository root
    #[serde(default = "default_build_config")]
    pub build_config: String,

    /// Build-output directory, relative to the repository root
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Remote checked for existing tags
    #[serde(default = "default_remote")]
    pub remote: String,
}

fn default_python() -> String {
    "python".to_string()
}

fn default_publisher() -> String {
    "twine".to_string()
}

fn default_build_config() -> String {
    "setup.py".to_string()
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            python: default_python(),
            publisher: default_publisher(),
            build_config: default_build_config(),
            dist_dir: default_dist_dir(),
            remote: default_remote(),
        }
    }
}

/// Location of the user-level configuration file, if the platform has one
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pyrelease").join(CONFIG_FILE_NAME))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the repository root
/// 3. `pyrelease/release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_root` - Repository the release runs in
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if repo_root.join(CONFIG_FILE_NAME).is_file() {
        Some(repo_root.join(CONFIG_FILE_NAME))
    } else {
        user_config_path().filter(|path| path.is_file())
    };

    let Some(path) = candidate else {
        tracing::debug!("no configuration file, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    parse_config(&config_str)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration text
pub fn parse_config(config_str: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}
