use crate::domain::{Commit, Tag};
use crate::error::{ReleaseRangeError, Result};
use crate::git::{Repository, RepositoryDescriptor};
use std::collections::HashMap;

/// Mock repository returning fixed commit and tag lists
pub struct MockRepository {
    descriptor: RepositoryDescriptor,
    branches: HashMap<String, Vec<Commit>>,
    tags: Vec<Tag>,
    tag_error: Option<String>,
    commit_error: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            descriptor: RepositoryDescriptor::new("test-owner", "test-repo", "main"),
            branches: HashMap::new(),
            tags: Vec::new(),
            tag_error: None,
            commit_error: None,
        }
    }

    /// Set the commits of a branch, newest first
    pub fn set_branch_commits(&mut self, branch: impl Into<String>, commits: Vec<Commit>) {
        self.branches.insert(branch.into(), commits);
    }

    /// Add a tag pointing to a commit sha
    pub fn add_tag(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.tags.push(Tag::new(name, sha));
    }

    /// Make `list_tags` fail with an API error
    pub fn fail_tags(&mut self, message: impl Into<String>) {
        self.tag_error = Some(message.into());
    }

    /// Make `list_commits_on_branch` fail with an API error
    pub fn fail_commits(&mut self, message: impl Into<String>) {
        self.commit_error = Some(message.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn repository(&self) -> &RepositoryDescriptor {
        &self.descriptor
    }

    fn list_commits_on_branch(&self, branch_name: &str) -> Result<Vec<Commit>> {
        if let Some(message) = &self.commit_error {
            return Err(ReleaseRangeError::api(message.clone()));
        }
        self.branches
            .get(branch_name)
            .cloned()
            .ok_or_else(|| ReleaseRangeError::api(format!("Branch not found: {}", branch_name)))
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        if let Some(message) = &self.tag_error {
            return Err(ReleaseRangeError::api(message.clone()));
        }
        Ok(self.tags.clone())
    }
}
