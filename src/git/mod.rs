//! Version-control operations abstraction layer
//!
//! The release workflow talks to git through the [Repository] trait. The
//! implementations are:
//!
//! - [system::SystemGit]: runs the `git` executable (the default backend)
//! - [repository::Git2Repository]: uses libgit2 through the `git2` crate and
//!   reads the configuration store directly
//! - [mock::MockRepository]: records calls, for testing
//!
//! Release targets and the push switch live in the git configuration under
//! [TARGET_KEY] and [PUSH_KEY].

pub mod mock;
pub mod repository;
pub mod system;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use system::SystemGit;

use crate::domain::Target;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Multi-valued key listing `<path>:<line>` release targets
pub const TARGET_KEY: &str = "release.target";

/// Key enabling push when set to `true`
pub const PUSH_KEY: &str = "release.push";

/// Common version-control operations used by the release workflow
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. A missing work tree maps to
/// [crate::error::ReleaseError::NotFound]; a failing `git` invocation maps to
/// [crate::error::ReleaseError::Process].
pub trait Repository {
    /// Top-level directory of the working tree
    fn root(&self) -> Result<PathBuf>;

    /// All values of a multi-valued configuration key, in configuration
    /// order. An unset key yields an empty list.
    fn config_values(&self, key: &str) -> Result<Vec<String>>;

    /// Value of a configuration key, `None` when unset
    fn config_value(&self, key: &str) -> Result<Option<String>>;

    /// Stage a file, given relative to the root
    fn add(&self, path: &Path) -> Result<()>;

    /// Commit the staged changes
    fn commit(&self, message: &str) -> Result<()>;

    /// Create an annotated tag on HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, remote: &str) -> Result<bool>;

    /// Push the current branch and the given tag to `remote`
    fn push(&self, remote: &str, tag: &str) -> Result<()>;
}

/// Read and parse every configured release target.
///
/// Fails on the first malformed entry, before any file is read.
pub fn release_targets<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Target>> {
    repo.config_values(TARGET_KEY)?
        .iter()
        .map(|value| Target::parse(value.trim()))
        .collect()
}

/// Whether pushing is enabled in the git configuration (`release.push = true`)
pub fn push_enabled<R: Repository + ?Sized>(repo: &R) -> Result<bool> {
    Ok(repo.config_value(PUSH_KEY)?.as_deref().map(str::trim) == Some("true"))
}
