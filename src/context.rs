//! Per-run release state

use crate::domain::{version, ReleaseType, Target};
use crate::error::Result;
use semver::Version;

/// State shared by every step of one release run.
///
/// `version` starts unset. The first target whose line contains a version
/// literal computes it; every later target is stamped with that same value.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub release_type: ReleaseType,
    pub preid: Option<String>,
    pub dry_run: bool,
    pub push_enabled: bool,
    pub targets: Vec<Target>,
    version: Option<Version>,
}

impl ReleaseContext {
    /// Create a context with no targets and no computed version
    pub fn new(release_type: ReleaseType, dry_run: bool) -> Self {
        ReleaseContext {
            release_type,
            preid: None,
            dry_run,
            push_enabled: false,
            targets: Vec::new(),
            version: None,
        }
    }

    pub fn with_preid(mut self, preid: Option<String>) -> Self {
        self.preid = preid;
        self
    }

    pub fn with_push(mut self, push_enabled: bool) -> Self {
        self.push_enabled = push_enabled;
        self
    }

    pub fn with_targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = targets;
        self
    }

    /// The version computed so far, if any
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Return the shared version, computing it from `matched` on first use.
    ///
    /// Once set, `matched` is ignored: the value is never recomputed.
    pub fn resolve_version(&mut self, matched: &str) -> Result<&Version> {
        let resolved = match self.version.take() {
            Some(existing) => existing,
            None => version::bump(matched, self.release_type, self.preid.as_deref())?,
        };
        Ok(self.version.insert(resolved))
    }
}
