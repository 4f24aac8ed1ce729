use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use git_release::cli::{run_release_workflow, ReleaseOutcome, ReleaseWorkflowArgs};
use git_release::config::{self, Backend, Config};
use git_release::domain::ReleaseType;
use git_release::git::{Git2Repository, Repository, SystemGit};
use git_release::package::NpmCli;
use git_release::ui::{self, Reporter};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump the version in tracked files, then commit, tag, test, push and publish"
)]
struct Args {
    #[arg(
        value_name = "RELEASE_TYPE",
        help = "One of: major, premajor, minor, preminor, patch, prepatch, prerelease"
    )]
    release_type: Option<String>,

    #[arg(short = 'n', long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Print every step")]
    verbose: bool,

    #[arg(long, value_name = "ID", help = "Pre-release identifier, e.g. beta")]
    preid: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Do not run the package tests")]
    no_test: bool,

    #[arg(long, help = "Do not push the commit and tag")]
    no_push: bool,

    #[arg(long, help = "Do not publish the package")]
    no_publish: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(release_type) = args.release_type.clone() else {
        ui::display_error(&format!(
            "missing release type (expected one of: {})",
            ReleaseType::keywords()
        ));
        return ExitCode::FAILURE;
    };

    match run(&args, release_type) {
        Ok(outcome) => {
            ui::display_release_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::display_aborted(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, release_type: String) -> Result<ReleaseOutcome> {
    // The release type is checked before anything else, config included
    release_type.parse::<ReleaseType>()?;
    let config = config::load_config(args.config.as_deref())?;
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;

    let repo = open_repository(&config, &cwd);
    let package_manager = NpmCli::new(config.package.manager.clone(), cwd);
    let reporter = Reporter::new(args.verbose);

    let workflow_args = ReleaseWorkflowArgs {
        release_type,
        preid: args.preid.clone(),
        dry_run: args.dry_run,
        no_test: args.no_test,
        no_push: args.no_push,
        no_publish: args.no_publish,
    };

    let outcome = run_release_workflow(
        &workflow_args,
        &config,
        repo.as_ref(),
        &package_manager,
        &reporter,
    )?;
    Ok(outcome)
}

/// Neither backend touches git until its first operation
fn open_repository(config: &Config, cwd: &std::path::Path) -> Box<dyn Repository> {
    match config.git.backend {
        Backend::System => Box::new(SystemGit::new(cwd)),
        Backend::Libgit2 => Box::new(Git2Repository::new(cwd)),
    }
}
