use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name of the package descriptor
pub const MANIFEST_FILE: &str = "package.json";

/// The fields of `package.json` the release workflow looks at
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Load the descriptor from `dir`.
    ///
    /// # Returns
    /// * `Ok(Some(manifest))` - The descriptor exists and parses
    /// * `Ok(None)` - There is no descriptor in `dir`
    /// * `Err` - The descriptor cannot be read or is not valid JSON
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let manifest = serde_json::from_str(&content).map_err(|e| {
            ReleaseError::config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Ok(Some(manifest))
    }

    /// Whether a non-empty `test` script is declared
    pub fn has_test_script(&self) -> bool {
        self.scripts
            .get("test")
            .is_some_and(|script| !script.trim().is_empty())
    }

    /// Package name for messages, falling back to a placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed package)")
    }

    /// `name@version`, or just the name when no version is declared
    pub fn display_id(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.display_name(), version),
            None => self.display_name().to_string(),
        }
    }
}
