//! Workflow orchestration for the CLI subcommands
//!
//! Keeps argument parsing in main.rs apart from the work itself, so both
//! workflows can be driven programmatically and from tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::action;
use crate::analyzer::{resolve_commit_range, CommitRange};
use crate::config::Config;
use crate::conventional::ConventionalCommitParser;
use crate::domain::Version;
use crate::git::{create_github_instance, Git2Repository, Repository};
use crate::metadata;
use crate::ui;

/// Where commits and tags are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Source {
    /// GitHub API, configured from the action inputs
    Github,
    /// A local git checkout
    Local,
}

/// Arguments for the commit-range workflow
#[derive(Debug, Clone, PartialEq)]
pub struct CommitsWorkflowArgs {
    /// Release branch to inspect
    pub branch: String,

    /// Version of the release preceding the one being prepared
    pub previous_version: Version,

    /// Default branch of the repository; the release branch when unset
    pub default_branch: Option<String>,

    pub source: Source,

    /// Checkout used with [Source::Local]
    pub repo_path: PathBuf,
}

/// Build the configured provider and resolve the commit range
pub fn run_commits_workflow(args: &CommitsWorkflowArgs, config: &Config) -> Result<CommitRange> {
    let default_branch = args
        .default_branch
        .clone()
        .unwrap_or_else(|| args.branch.clone());

    let repo: Box<dyn Repository> = match args.source {
        Source::Github => Box::new(
            create_github_instance(&default_branch, &config.github)
                .context("Failed to configure GitHub client")?
                .with_max_commits(config.max_commits),
        ),
        Source::Local => Box::new(
            Git2Repository::open(&args.repo_path, &default_branch)
                .with_context(|| {
                    format!("Failed to open repository at {}", args.repo_path.display())
                })?
                .with_max_commits(config.max_commits),
        ),
    };

    resolve_with_repository(repo.as_ref(), args, config)
}

/// Resolve the commit range against an already built provider
pub fn resolve_with_repository(
    repo: &dyn Repository,
    args: &CommitsWorkflowArgs,
    config: &Config,
) -> Result<CommitRange> {
    ui::display_status(&format!(
        "Resolving commits on '{}' in {} since {}",
        args.branch,
        repo.repository().full_name(),
        args.previous_version
    ));

    let parser = ConventionalCommitParser::new(config.conventional_commits.clone());
    let range = resolve_commit_range(repo, &args.branch, &args.previous_version, &parser)
        .with_context(|| format!("Failed to resolve commits on branch '{}'", args.branch))?;

    if let Some(warning) = &range.warning {
        ui::display_boundary_warning(warning);
    }
    ui::display_commit_summary(&range.commits, &args.branch);

    Ok(range)
}

/// Render the commits as JSON and publish the step outputs
///
/// Outputs: `commits` (JSON array), `count`, and `cutoff-sha` when a cutoff
/// tag was found. Returns the JSON written to `commits`.
pub fn emit_commit_outputs(range: &CommitRange) -> Result<String> {
    let json = serde_json::to_string(&range.commits)?;

    action::set_output("commits", &json)?;
    action::set_output("count", &range.commits.len().to_string())?;
    if let Some(cutoff) = &range.cutoff {
        action::set_output("cutoff-sha", &cutoff.sha)?;
    }

    Ok(json)
}

/// Read the release metadata file and format its version
///
/// `Ok(None)` means no release was computed this run.
pub fn run_version_workflow(release_file: &Path) -> Result<Option<String>> {
    let version = metadata::read_release_version(release_file).with_context(|| {
        format!(
            "Failed to read release metadata from {}",
            release_file.display()
        )
    })?;

    Ok(version.map(|v| metadata::format_version(&v)))
}
