use crate::domain::tag::validate_tag_name;
use crate::domain::VersionTemplate;
use crate::error::{ReleaseError, Result};
use crate::patcher::DEFAULT_VERSION_PATTERN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory
pub const CONFIG_FILE: &str = "gitrelease.toml";

/// Name of the configuration file looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Release targets and the push switch are read from the git configuration
/// (`release.target`, `release.push`); this file only tunes behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub package: PackageConfig,
}

fn default_tag_format() -> String {
    "v{version}".to_string()
}

fn default_commit_message() -> String {
    "Release v{version}".to_string()
}

/// Naming of release commits and tags, and version detection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Regular expression overriding the built-in version literal pattern
    #[serde(default)]
    pub version_pattern: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_format: default_tag_format(),
            commit_message: default_commit_message(),
            version_pattern: None,
        }
    }
}

/// Which implementation talks to git
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run the `git` executable
    #[default]
    System,
    /// Use libgit2 and read the configuration store directly
    Libgit2,
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Git-related settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub backend: Backend,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            backend: Backend::default(),
        }
    }
}

fn default_manager() -> String {
    "npm".to_string()
}

/// Package manager settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    /// Executable used for `prefix`, `test` and `publish`
    #[serde(default = "default_manager")]
    pub manager: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            manager: default_manager(),
        }
    }
}

impl Config {
    /// Template for tag names
    pub fn tag_template(&self) -> Result<VersionTemplate> {
        VersionTemplate::new(&self.release.tag_format)
    }

    /// Template for release commit messages
    pub fn commit_template(&self) -> Result<VersionTemplate> {
        VersionTemplate::new(&self.release.commit_message)
    }

    /// Regular expression locating version literals
    pub fn version_pattern(&self) -> &str {
        self.release
            .version_pattern
            .as_deref()
            .unwrap_or(DEFAULT_VERSION_PATTERN)
    }

    /// Check settings that serde cannot: templates and the remote name
    pub fn validate(&self) -> Result<()> {
        let tag = self.tag_template()?.format("0.0.0");
        validate_tag_name(&tag).map_err(|e| {
            ReleaseError::config(format!(
                "tag_format '{}' does not produce a valid tag: {}",
                self.release.tag_format, e
            ))
        })?;
        self.commit_template()?;

        if self.git.remote.trim().is_empty() {
            return Err(ReleaseError::config("git.remote must not be empty"));
        }
        if self.package.manager.trim().is_empty() {
            return Err(ReleaseError::config("package.manager must not be empty"));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text and validate it
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Locate the configuration file to use, if any.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the current directory
/// 3. `.gitrelease.toml` in the user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.is_file())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If the file cannot be read, parsed, or fails validation
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&content).map_err(|e| match e {
                ReleaseError::Config(msg) => {
                    ReleaseError::config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
        }
        None => Ok(Config::default()),
    }
}
