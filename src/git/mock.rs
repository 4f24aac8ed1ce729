use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations.
///
/// Every call is recorded as a short string (`"add package.json"`,
/// `"tag v1.2.4"`, ...) so tests can assert on the exact sequence.
pub struct MockRepository {
    root: PathBuf,
    config: HashMap<String, Vec<String>>,
    remotes: Vec<String>,
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

/// Operations that change the repository or a remote
pub const MUTATING_OPERATIONS: [&str; 4] = ["add", "commit", "tag", "push"];

impl MockRepository {
    /// Create a new mock repository rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MockRepository {
            root: root.into(),
            config: HashMap::new(),
            remotes: Vec::new(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Append a value to a configuration key
    pub fn add_config(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.entry(key.into()).or_default().push(value.into());
    }

    /// Register a remote
    pub fn add_remote(&mut self, name: impl Into<String>) {
        self.remotes.push(name.into());
    }

    /// Make every call of the given operation (e.g. "tag") fail
    pub fn fail_on(&mut self, operation: impl Into<String>) {
        self.fail_on = Some(operation.into());
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Recorded calls that would have changed the repository or a remote
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                let operation = call.split_whitespace().next().unwrap_or_default();
                MUTATING_OPERATIONS.contains(&operation)
            })
            .collect()
    }

    fn record(&self, call: String) -> Result<()> {
        let operation = call.split_whitespace().next().unwrap_or_default().to_string();
        self.calls.borrow_mut().push(call.clone());

        if self.fail_on.as_deref() == Some(operation.as_str()) {
            return Err(ReleaseError::Process {
                command: format!("git {}", call),
                code: 1,
                output: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Repository for MockRepository {
    fn root(&self) -> Result<PathBuf> {
        self.record("root".to_string())?;
        Ok(self.root.clone())
    }

    fn config_values(&self, key: &str) -> Result<Vec<String>> {
        self.record(format!("config --get-all {}", key))?;
        Ok(self.config.get(key).cloned().unwrap_or_default())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        self.record(format!("config --get {}", key))?;
        Ok(self.config.get(key).and_then(|values| values.last().cloned()))
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.record(format!("add {}", path.display()))
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message))
    }

    fn create_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.record(format!("tag {}", name))
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        self.record(format!("remote {}", remote))?;
        Ok(self.remotes.iter().any(|r| r == remote))
    }

    fn push(&self, remote: &str, tag: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, tag))
    }
}
