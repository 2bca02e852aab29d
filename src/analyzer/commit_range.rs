use crate::boundary::BoundaryWarning;
use crate::conventional::CommitParser;
use crate::domain::{Commit, ConventionalCommit, Tag, Version};
use crate::error::Result;
use crate::git::Repository;

/// Commits of a branch newer than the previous release
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRange {
    /// Tag of the previous release, when one was found
    pub cutoff: Option<Tag>,
    /// Conventional commits newest first, never including the cutoff commit
    pub commits: Vec<ConventionalCommit>,
    pub warning: Option<BoundaryWarning>,
}

/// Find the commits on `branch_name` since the release tagged `previous_version`
///
/// Returns an empty list when no tag matches the previous version or when the
/// tagged commit is the branch head. Provider errors propagate unchanged.
pub fn find_commits_since_last_release<R, P>(
    repo: &R,
    branch_name: &str,
    previous_version: &Version,
    parser: &P,
) -> Result<Vec<ConventionalCommit>>
where
    R: Repository + ?Sized,
    P: CommitParser + ?Sized,
{
    resolve_commit_range(repo, branch_name, previous_version, parser).map(|range| range.commits)
}

/// Same as [find_commits_since_last_release], keeping the cutoff tag and any
/// boundary warning for reporting.
pub fn resolve_commit_range<R, P>(
    repo: &R,
    branch_name: &str,
    previous_version: &Version,
    parser: &P,
) -> Result<CommitRange>
where
    R: Repository + ?Sized,
    P: CommitParser + ?Sized,
{
    let (tags, commits) = std::thread::scope(|scope| {
        let tags = scope.spawn(|| repo.list_tags());
        let commits = repo.list_commits_on_branch(branch_name);
        let tags = tags
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (tags, commits)
    });
    let tags = tags?;
    let commits = commits?;

    let Some(cutoff) = find_cutoff_tag(&tags, previous_version) else {
        let warning = BoundaryWarning::CutoffTagNotFound {
            version: previous_version.to_string(),
        };
        tracing::info!(%warning, "commit range boundary");
        return Ok(CommitRange {
            cutoff: None,
            commits: Vec::new(),
            warning: Some(warning),
        });
    };
    tracing::debug!(tag = %cutoff.name, sha = %cutoff.sha, "found cutoff tag");

    let (newer, found) = commits_until(&commits, &cutoff.sha);

    let warning = if !found {
        Some(BoundaryWarning::CutoffCommitMissing {
            tag: cutoff.name.clone(),
            sha: cutoff.sha.clone(),
            branch: branch_name.to_string(),
        })
    } else if newer.is_empty() {
        Some(BoundaryWarning::NoNewCommits {
            tag: cutoff.name.clone(),
            branch: branch_name.to_string(),
        })
    } else {
        None
    };
    if let Some(warning) = &warning {
        tracing::info!(%warning, "commit range boundary");
    }

    let commits: Vec<ConventionalCommit> = newer.iter().flat_map(|c| parser.parse(c)).collect();
    tracing::info!(
        count = commits.len(),
        branch = branch_name,
        since = %cutoff.name,
        "resolved commits since last release"
    );

    Ok(CommitRange {
        cutoff: Some(cutoff.clone()),
        commits,
        warning,
    })
}

/// Tag whose decoded version equals `version`
///
/// Several tags can decode to the same version (`v3.0.0`, `helm-loki-3.0.0`).
/// A plain `v<version>` or `<version>` name wins; otherwise the first match in
/// provider order is used.
pub fn find_cutoff_tag<'a>(tags: &'a [Tag], version: &Version) -> Option<&'a Tag> {
    let matches: Vec<&Tag> = tags
        .iter()
        .filter(|tag| {
            let matched = tag.matches_version(version);
            if !matched && tag.version().is_none() {
                tracing::trace!(tag = %tag.name, "tag does not decode to a version");
            }
            matched
        })
        .collect();

    if matches.len() > 1 {
        tracing::debug!(count = matches.len(), %version, "several tags match the previous version");
    }

    let plain = version.to_string();
    let prefixed = format!("v{}", plain);
    matches
        .iter()
        .find(|tag| tag.name == prefixed || tag.name == plain)
        .or_else(|| matches.first())
        .copied()
}

/// Commits strictly newer than `cutoff_sha`, and whether it was reached
///
/// When the cutoff is absent every commit is returned.
pub fn commits_until<'a>(commits: &'a [Commit], cutoff_sha: &str) -> (&'a [Commit], bool) {
    match commits.iter().position(|c| c.sha == cutoff_sha) {
        Some(index) => (&commits[..index], true),
        None => (commits, false),
    }
}
