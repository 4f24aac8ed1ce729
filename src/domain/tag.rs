use crate::error::{ReleaseError, Result};

const PLACEHOLDER: &str = "{version}";

/// Text template with a `{version}` placeholder (e.g. "v{version}",
/// "Release v{version}"), used for tag names and commit messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTemplate {
    pub pattern: String,
}

impl VersionTemplate {
    /// Create a template, rejecting patterns without the placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(PLACEHOLDER) {
            return Err(ReleaseError::config(format!(
                "template '{}' must contain the {} placeholder",
                pattern, PLACEHOLDER
            )));
        }
        Ok(VersionTemplate { pattern })
    }

    /// Substitute the version into the template
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace(PLACEHOLDER, version)
    }
}

/// Check that a rendered tag name is acceptable to git
pub fn validate_tag_name(tag: &str) -> Result<()> {
    let invalid = tag.is_empty()
        || tag.starts_with('-')
        || tag.starts_with('/')
        || tag.ends_with('/')
        || tag.ends_with(".lock")
        || tag.ends_with('.')
        || tag.contains("..")
        || tag.contains("@{")
        || tag.contains("//")
        || tag
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c));

    if invalid {
        return Err(ReleaseError::validation(format!(
            "'{}' is not a valid tag name",
            tag
        )));
    }
    Ok(())
}
