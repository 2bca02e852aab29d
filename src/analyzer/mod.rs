//! Commit-range resolution between a previous release tag and a branch head

pub mod commit_range;

pub use commit_range::{find_commits_since_last_release, resolve_commit_range, CommitRange};
