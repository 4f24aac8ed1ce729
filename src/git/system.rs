use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::process;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend driving the system `git` executable
pub struct SystemGit {
    cwd: PathBuf,
    root: OnceCell<PathBuf>,
}

impl SystemGit {
    /// Create a backend for the work tree containing `cwd`.
    ///
    /// No process is spawned until the first operation.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        SystemGit {
            cwd: cwd.into(),
            root: OnceCell::new(),
        }
    }

    fn git_in(dir: &Path) -> Command {
        let mut cmd = process::command("git");
        cmd.current_dir(dir);
        cmd
    }

    fn git(&self) -> Result<Command> {
        Ok(Self::git_in(&self.root()?))
    }

    /// `git config` lookups exit with status 1 when the key is unset
    fn config_lookup(&self, args: &[&str]) -> Result<Option<String>> {
        let mut cmd = self.git()?;
        cmd.arg("config").args(args);
        let out = process::output(&mut cmd)?;
        match out.status.code() {
            Some(0) => Ok(Some(String::from_utf8_lossy(&out.stdout).into_owned())),
            Some(1) => Ok(None),
            _ => Err(process::failure(&cmd, &out)),
        }
    }
}

impl Repository for SystemGit {
    fn root(&self) -> Result<PathBuf> {
        if let Some(root) = self.root.get() {
            return Ok(root.clone());
        }

        let mut cmd = Self::git_in(&self.cwd);
        cmd.args(["rev-parse", "--show-toplevel"]);
        let out = process::output(&mut cmd)?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            if stderr.contains("not a git repository") {
                return Err(ReleaseError::not_found(format!(
                    "{} is not inside a git work tree",
                    self.cwd.display()
                )));
            }
            return Err(process::failure(&cmd, &out));
        }

        let top = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if top.is_empty() {
            return Err(ReleaseError::not_found(format!(
                "{} has no working tree",
                self.cwd.display()
            )));
        }

        Ok(self.root.get_or_init(|| PathBuf::from(top)).clone())
    }

    fn config_values(&self, key: &str) -> Result<Vec<String>> {
        let values = self
            .config_lookup(&["--get-all", key])?
            .map(|stdout| {
                stdout
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(values)
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .config_lookup(&["--get", key])?
            .map(|stdout| stdout.trim().to_string()))
    }

    fn add(&self, path: &Path) -> Result<()> {
        let mut cmd = self.git()?;
        cmd.args(["add", "--"]).arg(path);
        process::run(&mut cmd)?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut cmd = self.git()?;
        cmd.args(["commit", "-m", message]);
        process::run(&mut cmd)?;
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let mut cmd = self.git()?;
        cmd.args(["tag", "-a", name, "-m", message]);
        process::run(&mut cmd)?;
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        let mut cmd = self.git()?;
        cmd.arg("remote");
        let stdout = process::run(&mut cmd)?;
        Ok(stdout.lines().any(|line| line.trim() == remote))
    }

    fn push(&self, remote: &str, tag: &str) -> Result<()> {
        let mut cmd = self.git()?;
        cmd.args(["push", remote, "HEAD", &format!("refs/tags/{}", tag)]);
        process::run(&mut cmd)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["config", "user.name", "Release Bot"]);
        git(dir.path(), &["config", "user.email", "release@example.com"]);
        git(dir.path(), &["config", "commit.gpgsign", "false"]);
        git(dir.path(), &["config", "tag.gpgsign", "false"]);
        dir
    }

    #[test]
    fn test_root_outside_repository_is_not_found() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let repo = SystemGit::new(dir.path());
        // A temp dir may itself live inside some checkout; only assert on the
        // error kind when discovery fails.
        if let Err(err) = repo.root() {
            assert!(matches!(
                err,
                ReleaseError::NotFound(_) | ReleaseError::Process { .. }
            ));
        }
    }

    #[test]
    fn test_root_from_subdirectory() {
        if !git_available() {
            return;
        }
        let dir = init_repo();
        let nested = dir.path().join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();

        let repo = SystemGit::new(&nested);
        let root = repo.root().unwrap();
        assert_eq!(
            fs::canonicalize(root).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_config_values_and_missing_keys() {
        if !git_available() {
            return;
        }
        let dir = init_repo();
        git(dir.path(), &["config", "--add", "release.target", "package.json:3"]);
        git(dir.path(), &["config", "--add", "release.target", "VERSION:1"]);
        git(dir.path(), &["config", "release.push", "true"]);

        let repo = SystemGit::new(dir.path());
        assert_eq!(
            repo.config_values("release.target").unwrap(),
            vec!["package.json:3".to_string(), "VERSION:1".to_string()]
        );
        assert_eq!(
            repo.config_value("release.push").unwrap(),
            Some("true".to_string())
        );
        assert!(repo.config_values("release.missing").unwrap().is_empty());
        assert_eq!(repo.config_value("release.missing").unwrap(), None);
    }

    #[test]
    fn test_add_commit_tag() {
        if !git_available() {
            return;
        }
        let dir = init_repo();
        fs::write(dir.path().join("VERSION"), "1.0.1\n").unwrap();

        let repo = SystemGit::new(dir.path());
        repo.add(Path::new("VERSION")).unwrap();
        repo.commit("Release v1.0.1").unwrap();
        repo.create_tag("v1.0.1", "Release v1.0.1").unwrap();

        let mut cmd = Command::new("git");
        cmd.current_dir(dir.path()).args(["tag", "--list"]);
        assert_eq!(process::run(&mut cmd).unwrap(), "v1.0.1");

        assert!(!repo.has_remote("origin").unwrap());
        // Tagging the same name twice fails
        assert!(matches!(
            repo.create_tag("v1.0.1", "again").unwrap_err(),
            ReleaseError::Process { .. }
        ));
    }

    #[test]
    fn test_commands_run_from_root() {
        if !git_available() {
            return;
        }
        let dir = init_repo();
        let nested = dir.path().join("docs");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("VERSION"), "2.0.0\n").unwrap();

        // Paths are relative to the root, not to the directory git-release ran in
        let repo = SystemGit::new(&nested);
        let cmd = repo.git().unwrap();
        assert_eq!(
            fs::canonicalize(cmd.get_current_dir().unwrap()).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
        repo.add(Path::new("VERSION")).unwrap();
        repo.commit("Release v2.0.0").unwrap();
    }
}
