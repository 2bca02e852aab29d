//! Repository provider abstraction
//!
//! This module provides a trait-based abstraction over the two reads the
//! commit-range resolver needs: the commits of a branch and the tags of the
//! repository.
//!
//! # Overview
//!
//! The concrete implementations include:
//!
//! - [github::GitHubRepository]: GitHub REST and GraphQL APIs over `ureq`
//! - [local::Git2Repository]: a local checkout through the `git2` crate
//! - [mock::MockRepository]: fixed commit and tag lists for testing
//!
//! # Usage
//!
//! Code should depend on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use release_range::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let tags = repo.list_tags()?;
//! let commits = repo.list_commits_on_branch("main")?;
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod local;
pub mod mock;

pub use github::{create_github_instance, parse_repo_url, GitHubRepository};
pub use local::Git2Repository;
pub use mock::MockRepository;

use crate::domain::{Commit, Tag};
use crate::error::Result;
use serde::Serialize;

/// Identity of the repository a provider is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDescriptor {
    pub owner: String,
    pub repo: String,
    pub default_branch: String,
}

impl RepositoryDescriptor {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        RepositoryDescriptor {
            owner: owner.into(),
            repo: repo.into(),
            default_branch: default_branch.into(),
        }
    }

    /// `owner/repo` form used in API paths and messages
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Read capabilities of a repository provider
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`: the resolver issues both reads
/// concurrently on scoped threads.
///
/// ## Error Handling
///
/// Provider failures (network, authentication, missing branch) are returned
/// as errors and never retried or swallowed here.
pub trait Repository: Send + Sync {
    /// The repository this provider is scoped to
    fn repository(&self) -> &RepositoryDescriptor;

    /// List the commits of a branch
    ///
    /// # Returns
    /// * `Ok(Vec<Commit>)` - Commits newest first
    /// * `Err` - If the branch does not exist or the provider fails
    fn list_commits_on_branch(&self, branch_name: &str) -> Result<Vec<Commit>>;

    /// List every tag in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<Tag>>;
}
