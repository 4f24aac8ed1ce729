use crate::error::{ReleaseError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A location holding a version literal: a file relative to the repository
/// root and a 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub file: PathBuf,
    pub line: usize,
}

impl Target {
    /// Create a new target
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Target {
            file: file.into(),
            line,
        }
    }

    /// Parse a `path:line` configuration value.
    ///
    /// The value is split at the last `:` so paths containing colons still
    /// parse. The line token must consist of ASCII digits only.
    pub fn parse(entry: &str) -> Result<Self> {
        let (file, line) = entry.rsplit_once(':').ok_or_else(|| {
            ReleaseError::validation(format!(
                "target '{}' is not of the form <path>:<line>",
                entry
            ))
        })?;

        if file.is_empty() {
            return Err(ReleaseError::validation(format!(
                "target '{}' has an empty path",
                entry
            )));
        }

        if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReleaseError::validation(format!(
                "invalid line number '{}' in target '{}'",
                line, entry
            )));
        }

        let line = line.parse::<usize>().map_err(|_| {
            ReleaseError::validation(format!(
                "line number '{}' in target '{}' is out of range",
                line, entry
            ))
        })?;

        Ok(Target::new(file, line))
    }

    /// Path of the target file under `root`
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.file)
    }
}

impl FromStr for Target {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Target::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
