use crate::error::{ReleaseError, Result};
use git2::{
    Commit, Cred, CredentialType, ErrorCode, ObjectType, PushOptions, RemoteCallbacks,
    Repository as Git2Repo,
};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Git backend built on libgit2.
///
/// Reads the configuration store directly instead of invoking `git config`.
/// The repository is discovered lazily from `cwd` on first use.
pub struct Git2Repository {
    cwd: PathBuf,
    repo: OnceCell<Git2Repo>,
}

impl Git2Repository {
    /// Create a backend for the repository containing `cwd`
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Git2Repository {
            cwd: cwd.into(),
            repo: OnceCell::new(),
        }
    }

    /// Create from an existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        let cwd = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        let cell = OnceCell::new();
        let _ = cell.set(repo);
        Git2Repository { cwd, repo: cell }
    }

    fn repo(&self) -> Result<&Git2Repo> {
        if let Some(repo) = self.repo.get() {
            return Ok(repo);
        }

        let repo = Git2Repo::discover(&self.cwd).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                ReleaseError::not_found(format!(
                    "{} is not inside a git work tree",
                    self.cwd.display()
                ))
            } else {
                ReleaseError::Git(e)
            }
        })?;

        Ok(self.repo.get_or_init(|| repo))
    }
}

/// Resolve credentials for push, trying SSH keys from ~/.ssh/, then the SSH
/// agent, then git's default credential helpers
fn credentials(
    _url: &str,
    username_from_url: Option<&str>,
    allowed_types: CredentialType,
) -> std::result::Result<Cred, git2::Error> {
    let username = username_from_url.unwrap_or("git");

    if allowed_types.contains(CredentialType::SSH_KEY) {
        if let Some(home) = dirs::home_dir() {
            for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                let path = home.join(".ssh").join(key);
                if path.exists() {
                    if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                        return Ok(cred);
                    }
                }
            }
        }

        if let Ok(cred) = Cred::ssh_key_from_agent(username) {
            return Ok(cred);
        }
    }

    Cred::default()
}

impl super::Repository for Git2Repository {
    fn root(&self) -> Result<PathBuf> {
        let repo = self.repo()?;
        let workdir = repo.workdir().ok_or_else(|| {
            ReleaseError::not_found(format!(
                "repository at {} has no working tree",
                repo.path().display()
            ))
        })?;
        // libgit2 reports the workdir with a trailing separator
        Ok(workdir.components().collect())
    }

    fn config_values(&self, key: &str) -> Result<Vec<String>> {
        let config = self.repo()?.config()?;
        let mut entries = match config.multivar(key, None) {
            Ok(entries) => entries,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut values = Vec::new();
        while let Some(entry) = entries.next() {
            let entry = entry?;
            if let Some(value) = entry.value() {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let config = self.repo()?.config()?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn add(&self, path: &Path) -> Result<()> {
        let mut index = self.repo()?.index()?;
        index.add_path(path)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut index = repo.index()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = repo.signature()?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let target = repo.head()?.peel(ObjectType::Commit)?;
        let signature = repo.signature()?;
        repo.tag(name, &target, &signature, message, false)?;
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        let remotes = self.repo()?.remotes()?;
        let found = remotes.iter().flatten().any(|name| name == remote);
        Ok(found)
    }

    fn push(&self, remote_name: &str, tag: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut remote = repo.find_remote(remote_name).map_err(|e| {
            ReleaseError::not_found(format!("no remote named '{}': {}", remote_name, e))
        })?;

        let head = repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::validation(
                "HEAD is detached; cannot push the current branch",
            ));
        }
        let branch_ref = head
            .name()
            .ok_or_else(|| ReleaseError::validation("HEAD reference name is not valid UTF-8"))?
            .to_string();
        let tag_ref = format!("refs/tags/{}", tag);

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(credentials);
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, message
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote.push(
            &[branch_ref.as_str(), tag_ref.as_str()],
            Some(&mut push_options),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn init_raw() -> (TempDir, Git2Repo) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Release Bot").unwrap();
            config.set_str("user.email", "release@example.com").unwrap();
        }
        (dir, repo)
    }

    fn init_repo() -> (TempDir, Git2Repository) {
        let (dir, repo) = init_raw();
        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_root_matches_workdir() {
        let (dir, repo) = init_repo();
        assert_eq!(
            fs::canonicalize(repo.root().unwrap()).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_lazy_discovery_from_subdirectory() {
        let (dir, _) = init_repo();
        let nested = dir.path().join("docs");
        fs::create_dir_all(&nested).unwrap();

        let repo = Git2Repository::new(&nested);
        assert_eq!(
            fs::canonicalize(repo.root().unwrap()).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_config_reads() {
        let (_dir, raw) = init_raw();
        {
            let mut config = raw.config().unwrap();
            config
                .set_multivar("release.target", "^$", "package.json:3")
                .unwrap();
            config
                .set_multivar("release.target", "^$", "VERSION:1")
                .unwrap();
            config.set_str("release.push", "true").unwrap();
        }
        let repo = Git2Repository::from_git2(raw);

        let values = repo.config_values("release.target").unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&"package.json:3".to_string()));
        assert!(values.contains(&"VERSION:1".to_string()));
        assert_eq!(
            repo.config_value("release.push").unwrap(),
            Some("true".to_string())
        );
        assert!(repo.config_values("release.nothing").unwrap().is_empty());
        assert_eq!(repo.config_value("release.nothing").unwrap(), None);
    }

    #[test]
    fn test_add_commit_and_tag() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("VERSION"), "2.0.0\n").unwrap();

        repo.add(Path::new("VERSION")).unwrap();
        repo.commit("Release v2.0.0").unwrap();
        repo.create_tag("v2.0.0", "Release v2.0.0").unwrap();

        let raw = Git2Repo::open(dir.path()).unwrap();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("Release v2.0.0"));
        assert!(head.tree().unwrap().get_name("VERSION").is_some());

        let tag = raw
            .find_reference("refs/tags/v2.0.0")
            .unwrap()
            .peel_to_tag()
            .unwrap();
        assert_eq!(tag.target_id(), head.id());

        assert!(repo.create_tag("v2.0.0", "again").is_err());
    }

    #[test]
    fn test_second_commit_has_parent() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("VERSION"), "1.0.0\n").unwrap();
        repo.add(Path::new("VERSION")).unwrap();
        repo.commit("first").unwrap();

        fs::write(dir.path().join("VERSION"), "1.0.1\n").unwrap();
        repo.add(Path::new("VERSION")).unwrap();
        repo.commit("second").unwrap();

        let raw = Git2Repo::open(dir.path()).unwrap();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.parent_count(), 1);
        assert_eq!(head.parent(0).unwrap().message(), Some("first"));
    }

    #[test]
    fn test_remotes() {
        let (dir, raw) = init_raw();
        let without_remote = Git2Repository::new(dir.path());
        assert!(!without_remote.has_remote("origin").unwrap());

        raw.remote("origin", "https://example.com/demo.git").unwrap();
        let repo = Git2Repository::from_git2(raw);
        assert!(repo.has_remote("origin").unwrap());
        assert!(!repo.has_remote("upstream").unwrap());
    }

    #[test]
    fn test_push_to_unknown_remote_is_not_found() {
        let (_dir, repo) = init_repo();
        let err = repo.push("origin", "v1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::NotFound(_)));
    }
}
