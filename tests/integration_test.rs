// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn git_release(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-release"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git-release")
}

fn git(dir: &Path, args: &[&str]) -> Output {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git")
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// A committed work tree with one release target and a local config file
fn init_work_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for args in [
        vec!["init", "-q"],
        vec!["config", "user.name", "Release Bot"],
        vec!["config", "user.email", "release@example.com"],
        vec!["config", "commit.gpgsign", "false"],
        vec!["config", "tag.gpgsign", "false"],
        vec!["config", "--add", "release.target", "VERSION:1"],
    ] {
        assert!(git(root, &args).status.success());
    }

    fs::write(root.join("VERSION"), "0.4.2\n").unwrap();
    fs::write(root.join("gitrelease.toml"), "[git]\nremote = \"origin\"\n").unwrap();
    assert!(git(root, &["add", "."]).status.success());
    assert!(git(root, &["commit", "-q", "-m", "initial"]).status.success());
    dir
}

#[test]
fn test_git_release_help() {
    let dir = TempDir::new().unwrap();
    let output = git_release(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-release"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--no-publish"));
}

#[test]
fn test_git_release_version() {
    let dir = TempDir::new().unwrap();
    let output = git_release(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_release_type_exits_1() {
    let dir = TempDir::new().unwrap();
    let output = git_release(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing release type"));
}

#[test]
fn test_invalid_release_type_exits_1() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gitrelease.toml"), "").unwrap();
    let output = git_release(dir.path(), &["gigantic"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("gigantic"));
    assert!(stderr.contains("prerelease"));
}

#[test]
fn test_invalid_release_type_reported_before_bad_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gitrelease.toml"), "[release\n").unwrap();
    let output = git_release(dir.path(), &["gigantic"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown release type 'gigantic'"));
    assert!(!stderr.contains("Configuration error"));
}

#[test]
fn test_bad_config_exits_1() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("gitrelease.toml"),
        "[release]\ntag_format = \"latest\"\n",
    )
    .unwrap();
    let output = git_release(dir.path(), &["patch"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_release_in_real_repository() {
    if !git_available() {
        return;
    }
    let dir = init_work_tree();
    let root = dir.path();

    let output = git_release(root, &["minor", "--no-test", "--no-publish", "--no-push"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "0.5.0\n");

    let tags = git(root, &["tag", "--list"]);
    assert_eq!(String::from_utf8_lossy(&tags.stdout).trim(), "v0.5.0");

    let subject = git(root, &["log", "-1", "--format=%s"]);
    assert_eq!(String::from_utf8_lossy(&subject.stdout).trim(), "Release v0.5.0");

    let status = git(root, &["status", "--porcelain"]);
    assert!(String::from_utf8_lossy(&status.stdout).trim().is_empty());
}

#[test]
fn test_dry_run_in_real_repository() {
    if !git_available() {
        return;
    }
    let dir = init_work_tree();
    let root = dir.path();

    let output = git_release(root, &["major", "--dry-run", "--no-test", "--no-publish"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1.0.0"));
    assert!(stdout.contains("would"));

    assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "0.4.2\n");
    let tags = git(root, &["tag", "--list"]);
    assert!(String::from_utf8_lossy(&tags.stdout).trim().is_empty());
}
