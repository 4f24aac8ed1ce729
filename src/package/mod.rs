//! Package manager collaborator: locating the package, running its tests and
//! publishing it

pub mod manifest;
pub mod mock;
pub mod npm;

pub use manifest::PackageManifest;
pub use mock::MockPackageManager;
pub use npm::NpmCli;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Operations the release workflow needs from a package manager
pub trait PackageManager {
    /// Name shown in progress messages (e.g. "npm")
    fn name(&self) -> &str;

    /// Directory of the nearest package, as reported by `<pm> prefix`
    fn prefix(&self) -> Result<PathBuf>;

    /// Run the package's test script in `dir`
    fn test(&self, dir: &Path) -> Result<()>;

    /// Publish the package in `dir`
    fn publish(&self, dir: &Path) -> Result<()>;
}
