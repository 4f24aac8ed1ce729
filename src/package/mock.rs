use crate::error::{ReleaseError, Result};
use crate::package::PackageManager;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Mock package manager recording `prefix`, `test` and `publish` calls
pub struct MockPackageManager {
    prefix: PathBuf,
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl MockPackageManager {
    /// Create a mock whose package lives in `prefix`
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        MockPackageManager {
            prefix: prefix.into(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make the given operation ("prefix", "test" or "publish") fail
    pub fn fail_on(&mut self, operation: impl Into<String>) {
        self.fail_on = Some(operation.into());
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &str) -> Result<()> {
        self.calls.borrow_mut().push(operation.to_string());
        if self.fail_on.as_deref() == Some(operation) {
            return Err(ReleaseError::Process {
                command: format!("npm {}", operation),
                code: 1,
                output: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl PackageManager for MockPackageManager {
    fn name(&self) -> &str {
        "npm"
    }

    fn prefix(&self) -> Result<PathBuf> {
        self.record("prefix")?;
        Ok(self.prefix.clone())
    }

    fn test(&self, _dir: &Path) -> Result<()> {
        self.record("test")
    }

    fn publish(&self, _dir: &Path) -> Result<()> {
        self.record("publish")
    }
}
