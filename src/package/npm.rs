use crate::error::{ReleaseError, Result};
use crate::package::PackageManager;
use crate::process;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Package manager driven through its command line (`npm` by default)
pub struct NpmCli {
    program: String,
    cwd: PathBuf,
}

impl NpmCli {
    /// Create a driver for `program`, resolving the package from `cwd`
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        NpmCli {
            program: program.into(),
            cwd: cwd.into(),
        }
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = process::command(&self.program);
        cmd.current_dir(dir);
        cmd
    }
}

impl PackageManager for NpmCli {
    fn name(&self) -> &str {
        &self.program
    }

    fn prefix(&self) -> Result<PathBuf> {
        let mut cmd = self.command(&self.cwd);
        cmd.arg("prefix");
        let stdout = process::run(&mut cmd)?;
        let prefix = stdout.lines().last().unwrap_or_default().trim();
        if prefix.is_empty() {
            return Err(ReleaseError::not_found(format!(
                "`{} prefix` did not report a package directory",
                self.program
            )));
        }
        Ok(PathBuf::from(prefix))
    }

    fn test(&self, dir: &Path) -> Result<()> {
        let mut cmd = self.command(dir);
        cmd.arg("test");
        process::run(&mut cmd)?;
        Ok(())
    }

    fn publish(&self, dir: &Path) -> Result<()> {
        let mut cmd = self.command(dir);
        cmd.arg("publish");
        process::run(&mut cmd)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_is_program() {
        let npm = NpmCli::new("pnpm", ".");
        assert_eq!(npm.name(), "pnpm");
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let npm = NpmCli::new("no-such-package-manager-91d2", dir.path());
        assert!(matches!(
            npm.prefix().unwrap_err(),
            ReleaseError::Spawn { .. }
        ));
        assert!(matches!(
            npm.test(dir.path()).unwrap_err(),
            ReleaseError::Spawn { .. }
        ));
    }
}
