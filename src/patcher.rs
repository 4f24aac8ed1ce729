//! Line-targeted version substitution
//!
//! A target is patched in two phases. [`VersionPatcher::prepare`] reads the
//! file, locates the version literal on the configured line and builds the
//! new content in memory. [`PreparedPatch::write`] puts it on disk. The
//! orchestrator prepares every target before writing any of them.

use crate::context::ReleaseContext;
use crate::domain::{LineEnding, Target};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Semantic version literal with optional pre-release and build suffixes
pub const DEFAULT_VERSION_PATTERN: &str = r"\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?";

/// Compiled regular expression locating a version literal within a line
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
}

impl VersionPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            ReleaseError::config(format!("invalid version pattern '{}': {}", pattern, e))
        })?;
        Ok(VersionPattern { regex })
    }

    /// First match in `line`, as a byte range and the matched text
    pub fn find<'a>(&self, line: &'a str) -> Option<(std::ops::Range<usize>, &'a str)> {
        self.regex.find(line).map(|m| (m.range(), m.as_str()))
    }
}

/// New content for one target, computed but not yet written
#[derive(Debug, Clone)]
pub struct PreparedPatch {
    pub target: Target,
    pub path: PathBuf,
    pub line_ending: LineEnding,
    /// Version literal found on the target line, if any
    pub matched: Option<String>,
    /// Version written in place of `matched`
    pub replacement: Option<String>,
    content: String,
}

impl PreparedPatch {
    /// Whether the target line held a version literal
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    /// Full file content after substitution
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the patched content back to the target file
    pub fn write(&self) -> Result<()> {
        fs::write(&self.path, &self.content)?;
        Ok(())
    }
}

/// Applies version substitutions to files under a repository root
pub struct VersionPatcher<'a> {
    root: &'a Path,
    pattern: &'a VersionPattern,
}

impl<'a> VersionPatcher<'a> {
    pub fn new(root: &'a Path, pattern: &'a VersionPattern) -> Self {
        VersionPatcher { root, pattern }
    }

    /// Compute the patched content for `target`.
    ///
    /// The first version literal on the target line is replaced by the
    /// context's shared version, which is computed from that literal if no
    /// earlier target has set it yet. A line without a literal is left as
    /// is and does not set the version.
    ///
    /// # Returns
    /// * `Ok(PreparedPatch)` - New content, ready to write
    /// * `Err` - If the file is missing, the line is out of range, or the
    ///   literal is not a valid semantic version
    pub fn prepare(&self, target: &Target, ctx: &mut ReleaseContext) -> Result<PreparedPatch> {
        let path = target.resolve(self.root);
        if !path.is_file() {
            return Err(ReleaseError::not_found(format!(
                "target file {} does not exist",
                path.display()
            )));
        }

        let original = fs::read_to_string(&path)?;
        let line_ending = LineEnding::detect(&original);
        let mut lines: Vec<String> = line_ending
            .split(&original)
            .into_iter()
            .map(String::from)
            .collect();

        if target.line == 0 || target.line > lines.len() {
            return Err(ReleaseError::validation(format!(
                "line {} is out of range for {} ({} lines)",
                target.line,
                target.file.display(),
                lines.len()
            )));
        }

        let index = target.line - 1;
        let mut matched = None;
        let mut replacement = None;

        if let Some((range, literal)) = self.pattern.find(&lines[index]) {
            let version = ctx.resolve_version(literal)?.to_string();
            let line = &lines[index];
            let patched = format!("{}{}{}", &line[..range.start], version, &line[range.end..]);
            matched = Some(literal.to_string());
            replacement = Some(version);
            lines[index] = patched;
        }

        Ok(PreparedPatch {
            target: target.clone(),
            path,
            line_ending,
            matched,
            replacement,
            content: line_ending.join(&lines),
        })
    }
}
