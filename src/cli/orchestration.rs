//! Main workflow orchestration logic
//!
//! The release runs as a fixed sequence of fallible steps:
//!
//! 1. Inspect the release type (before any external process runs)
//! 2. Locate the repository root
//! 3. Read `release.target` and `release.push` from the git configuration
//! 4. Prepare every target in memory
//! 5. Write and stage each patched target
//! 6. Commit, then tag
//! 7. Run the package tests
//! 8. Push the branch and tag
//! 9. Publish the package
//!
//! The first failing step aborts the run. Nothing already written or staged
//! is rolled back. In dry-run mode every mutating step is reported instead
//! of performed.

use crate::config::Config;
use crate::context::ReleaseContext;
use crate::domain::tag::validate_tag_name;
use crate::domain::{version, ReleaseType};
use crate::error::{ReleaseError, Result};
use crate::git::{self, Repository};
use crate::package::{PackageManager, PackageManifest};
use crate::patcher::{PreparedPatch, VersionPatcher, VersionPattern};
use crate::ui::Reporter;
use std::path::{Path, PathBuf};

/// Arguments for the release workflow
///
/// Mirrors the CLI flags without depending on clap, so the workflow can be
/// driven programmatically and from tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Release type keyword, checked before anything else runs
    pub release_type: String,

    /// Pre-release identifier for `pre*` release types
    pub preid: Option<String>,

    /// Report mutating steps instead of running them
    pub dry_run: bool,

    pub no_test: bool,
    pub no_push: bool,
    pub no_publish: bool,
}

impl ReleaseWorkflowArgs {
    pub fn new(release_type: impl Into<String>) -> Self {
        ReleaseWorkflowArgs {
            release_type: release_type.into(),
            ..Default::default()
        }
    }
}

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// The version stamped into every matched target
    pub version: String,

    /// The tag created (or that would be created)
    pub tag: String,

    /// Patched files, relative to the repository root
    pub files: Vec<PathBuf>,

    pub committed: bool,
    pub tagged: bool,
    pub tested: bool,
    pub pushed: bool,
    pub published: bool,
    pub dry_run: bool,
}

/// Package directory and its descriptor, located on first use
struct PackageInfo {
    dir: PathBuf,
    manifest: Option<PackageManifest>,
}

/// Main release workflow
///
/// # Arguments
///
/// * `args` - Release type and CLI switches
/// * `config` - Tool configuration (templates, remote, version pattern)
/// * `repo` - Version-control collaborator
/// * `package_manager` - Runs `prefix`, `test` and `publish`
/// * `reporter` - Progress output
///
/// # Returns
///
/// * `Ok(ReleaseOutcome)` - What was (or, in dry-run, would be) released
/// * `Err` - The error of the first step that failed
pub fn run_release_workflow<R, P>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &R,
    package_manager: &P,
    reporter: &Reporter,
) -> Result<ReleaseOutcome>
where
    R: Repository + ?Sized,
    P: PackageManager + ?Sized,
{
    let release_type: ReleaseType = args.release_type.parse()?;
    if let Some(preid) = args.preid.as_deref() {
        version::validate_preid(preid)?;
        if !release_type.is_prerelease() {
            reporter.warn(&format!(
                "--preid {} has no effect on a {} release",
                preid, release_type
            ));
        }
    }
    let tag_template = config.tag_template()?;
    let commit_template = config.commit_template()?;
    let pattern = VersionPattern::new(config.version_pattern())?;

    reporter.step("Locating repository root");
    let root = repo.root()?;
    reporter.done(&format!("Repository root: {}", root.display()));

    let targets = git::release_targets(repo)?;
    if targets.is_empty() {
        return Err(ReleaseError::config(format!(
            "no release targets configured; add one with `git config --add {} <file>:<line>`",
            git::TARGET_KEY
        )));
    }
    let push_configured = git::push_enabled(repo)?;

    let mut ctx = ReleaseContext::new(release_type, args.dry_run)
        .with_preid(args.preid.clone())
        .with_push(push_configured && !args.no_push)
        .with_targets(targets);

    let patches = prepare_targets(&mut ctx, &root, &pattern, reporter)?;
    let new_version = ctx.version().map(ToString::to_string).ok_or_else(|| {
        ReleaseError::validation(format!(
            "no version found on any configured {} line",
            git::TARGET_KEY
        ))
    })?;

    let tag = tag_template.format(&new_version);
    validate_tag_name(&tag)?;
    let message = commit_template.format(&new_version);

    let mut outcome = ReleaseOutcome {
        version: new_version,
        tag,
        files: Vec::new(),
        committed: false,
        tagged: false,
        tested: false,
        pushed: false,
        published: false,
        dry_run: ctx.dry_run,
    };

    for patch in patches.iter().filter(|patch| patch.is_match()) {
        write_target(patch, repo, &ctx, reporter)?;
        outcome.files.push(patch.target.file.clone());
    }

    if ctx.dry_run {
        reporter.dry_run(&format!("commit \"{}\"", message));
        reporter.dry_run(&format!("create tag {}", outcome.tag));
    } else {
        reporter.step(&format!("Committing \"{}\"", message));
        repo.commit(&message)?;
        outcome.committed = true;

        reporter.step(&format!("Creating tag {}", outcome.tag));
        repo.create_tag(&outcome.tag, &message)?;
        outcome.tagged = true;
        reporter.done(&format!("Tagged {}", outcome.tag));
    }

    let package = if args.no_test && args.no_publish {
        None
    } else {
        Some(locate_package(package_manager, reporter)?)
    };

    if args.no_test {
        reporter.skipped("Tests skipped (--no-test)");
    } else if let Some(package) = &package {
        outcome.tested = run_tests(package, package_manager, reporter)?;
    }

    outcome.pushed = push(&ctx, config, &outcome.tag, repo, reporter)?;

    if args.no_publish {
        reporter.skipped("Publish skipped (--no-publish)");
    } else if let Some(package) = &package {
        outcome.published = publish(package, &ctx, package_manager, reporter)?;
    }

    Ok(outcome)
}

/// Prepare every configured target before any file is written
fn prepare_targets(
    ctx: &mut ReleaseContext,
    root: &Path,
    pattern: &VersionPattern,
    reporter: &Reporter,
) -> Result<Vec<PreparedPatch>> {
    let patcher = VersionPatcher::new(root, pattern);
    let targets = ctx.targets.clone();
    let mut patches = Vec::with_capacity(targets.len());

    for target in &targets {
        reporter.step(&format!("Reading {}", target));
        let patch = patcher.prepare(target, ctx)?;
        match (&patch.matched, &patch.replacement) {
            (Some(from), Some(to)) => reporter.done(&format!("{}: {} -> {}", target, from, to)),
            _ => reporter.warn(&format!("no version found on {}; line left unchanged", target)),
        }
        patches.push(patch);
    }

    Ok(patches)
}

fn write_target<R>(
    patch: &PreparedPatch,
    repo: &R,
    ctx: &ReleaseContext,
    reporter: &Reporter,
) -> Result<()>
where
    R: Repository + ?Sized,
{
    let file = patch.target.file.display();
    if ctx.dry_run {
        reporter.dry_run(&format!("write and stage {}", file));
        return Ok(());
    }

    reporter.step(&format!("Writing {}", file));
    patch.write()?;
    repo.add(&patch.target.file)?;
    reporter.done(&format!("Staged {}", file));
    Ok(())
}

fn locate_package<P>(package_manager: &P, reporter: &Reporter) -> Result<PackageInfo>
where
    P: PackageManager + ?Sized,
{
    reporter.step(&format!("Locating package with `{} prefix`", package_manager.name()));
    let dir = package_manager.prefix()?;
    let manifest = PackageManifest::load(&dir)?;
    if let Some(manifest) = &manifest {
        reporter.done(&format!("Package {} in {}", manifest.display_id(), dir.display()));
    }
    Ok(PackageInfo { dir, manifest })
}

/// Tests are read-only and run in dry-run mode too
fn run_tests<P>(package: &PackageInfo, package_manager: &P, reporter: &Reporter) -> Result<bool>
where
    P: PackageManager + ?Sized,
{
    match &package.manifest {
        Some(manifest) if manifest.has_test_script() => {
            reporter.step(&format!("Running `{} test`", package_manager.name()));
            package_manager.test(&package.dir)?;
            reporter.done("Tests passed");
            Ok(true)
        }
        Some(_) => {
            reporter.skipped("Tests skipped (no test script)");
            Ok(false)
        }
        None => {
            reporter.skipped("Tests skipped (no package.json)");
            Ok(false)
        }
    }
}

fn push<R>(
    ctx: &ReleaseContext,
    config: &Config,
    tag: &str,
    repo: &R,
    reporter: &Reporter,
) -> Result<bool>
where
    R: Repository + ?Sized,
{
    if !ctx.push_enabled {
        reporter.skipped("Push skipped");
        return Ok(false);
    }

    let remote = config.git.remote.as_str();
    if !repo.has_remote(remote)? {
        reporter.warn(&format!("remote '{}' does not exist; push skipped", remote));
        return Ok(false);
    }

    if ctx.dry_run {
        reporter.dry_run(&format!("push HEAD and {} to {}", tag, remote));
        return Ok(false);
    }

    reporter.step(&format!("Pushing HEAD and {} to {}", tag, remote));
    repo.push(remote, tag)?;
    reporter.done(&format!("Pushed to {}", remote));
    Ok(true)
}

fn publish<P>(
    package: &PackageInfo,
    ctx: &ReleaseContext,
    package_manager: &P,
    reporter: &Reporter,
) -> Result<bool>
where
    P: PackageManager + ?Sized,
{
    let manifest = match &package.manifest {
        Some(manifest) => manifest,
        None => {
            reporter.skipped("Publish skipped (no package.json)");
            return Ok(false);
        }
    };
    if manifest.private {
        reporter.skipped(&format!(
            "Publish skipped ({} is private)",
            manifest.display_name()
        ));
        return Ok(false);
    }

    if ctx.dry_run {
        reporter.dry_run(&format!("publish {}", manifest.display_name()));
        return Ok(false);
    }

    reporter.step(&format!("Running `{} publish`", package_manager.name()));
    package_manager.publish(&package.dir)?;
    reporter.done(&format!("Published {}", manifest.display_id()));
    Ok(true)
}
