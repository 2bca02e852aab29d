use std::fmt;

use crate::domain::short_sha;

/// Non-fatal conditions met while bounding a commit range.
/// These are reported to the user but never fail the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag decodes to the previous release version
    CutoffTagNotFound { version: String },
    /// The cutoff tag exists but its commit is not in the branch history
    CutoffCommitMissing {
        tag: String,
        sha: String,
        branch: String,
    },
    /// The cutoff commit is the branch head
    NoNewCommits { tag: String, branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::CutoffTagNotFound { version } => {
                write!(
                    f,
                    "No tag found for previous release {}; cannot determine commit range",
                    version
                )
            }
            BoundaryWarning::CutoffCommitMissing { tag, sha, branch } => {
                write!(
                    f,
                    "Commit {} tagged '{}' is not on branch '{}'; using all fetched commits",
                    short_sha(sha),
                    tag,
                    branch
                )
            }
            BoundaryWarning::NoNewCommits { tag, branch } => {
                write!(f, "No new commits on branch '{}' since tag '{}'", branch, tag)
            }
        }
    }
}
