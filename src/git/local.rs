use crate::domain::{Commit, Tag};
use crate::error::Result;
use crate::git::{parse_repo_url, Repository, RepositoryDescriptor};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Provider reading a local checkout through git2
///
/// Branches resolve to `refs/heads/<branch>` first and fall back to
/// `refs/remotes/origin/<branch>`, which is what a CI checkout usually has.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    descriptor: RepositoryDescriptor,
    max_commits: Option<usize>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P, default_branch: &str) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Self::from_git2(repo, default_branch))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, default_branch: &str) -> Self {
        let descriptor = describe(&repo, default_branch);
        Git2Repository {
            repo: Mutex::new(repo),
            descriptor,
            max_commits: None,
        }
    }

    /// Stop walking history after this many commits
    pub fn with_max_commits(mut self, max_commits: Option<usize>) -> Self {
        self.max_commits = max_commits;
        self
    }

    /// Run `f` with exclusive access to the git2 handle
    ///
    /// A panic in an earlier reader poisons the lock; the handle itself holds
    /// no half-written state, so it is reused.
    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self.repo.lock().unwrap_or_else(PoisonError::into_inner);
        f(&repo)
    }
}

/// Owner and name from the `origin` remote, else the working directory name
fn describe(repo: &Git2Repo, default_branch: &str) -> RepositoryDescriptor {
    let from_remote = repo
        .find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().map(str::to_string))
        .and_then(|url| owner_and_repo_from_remote_url(&url));

    let (owner, name) = from_remote.unwrap_or_else(|| {
        let name = repo
            .workdir()
            .and_then(|dir| dir.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (String::new(), name)
    });

    RepositoryDescriptor::new(owner, name, default_branch)
}

/// Extract `owner/repo` from an https or ssh remote URL
pub fn owner_and_repo_from_remote_url(url: &str) -> Option<(String, String)> {
    let path = url
        .trim()
        .trim_end_matches('/')
        .trim_end_matches(".git");

    let path = if let Some((_, rest)) = path.split_once("://") {
        rest.split_once('/')?.1
    } else {
        path.split_once(':')?.1
    };

    let mut segments = path.rsplitn(3, '/');
    let repo = segments.next()?;
    let owner = segments.next()?;
    parse_repo_url(&format!("{}/{}", owner, repo)).ok()
}

fn branch_head(repo: &Git2Repo, branch_name: &str) -> Result<Oid> {
    match repo.refname_to_id(&format!("refs/heads/{}", branch_name)) {
        Ok(oid) => Ok(oid),
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            Ok(repo.refname_to_id(&format!("refs/remotes/origin/{}", branch_name))?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Paths touched by a commit relative to its first parent
fn changed_files(repo: &Git2Repo, commit: &git2::Commit) -> Result<Vec<String>> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    Ok(diff
        .deltas()
        .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

impl Repository for Git2Repository {
    fn repository(&self) -> &RepositoryDescriptor {
        &self.descriptor
    }

    fn list_commits_on_branch(&self, branch_name: &str) -> Result<Vec<Commit>> {
        self.with_repo(|repo| {
            let head = branch_head(repo, branch_name)?;

            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
            revwalk.push(head)?;

            let mut commits = Vec::new();
            for oid_result in revwalk {
                if self.max_commits.is_some_and(|max| commits.len() >= max) {
                    break;
                }

                let oid = oid_result?;
                let commit = repo.find_commit(oid)?;
                let message = commit.message().unwrap_or("(empty message)").to_string();
                let files = changed_files(repo, &commit)?;

                commits.push(Commit::new(oid.to_string(), message).with_files(files));
            }

            Ok(commits)
        })
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.with_repo(|repo| {
            let names = repo.tag_names(None)?;
            let mut tags = Vec::new();

            for name in names.iter().flatten() {
                let target = repo
                    .revparse_single(&format!("refs/tags/{}", name))
                    .and_then(|object| object.peel_to_commit());

                match target {
                    Ok(commit) => tags.push(Tag::new(name, commit.id().to_string())),
                    Err(e) => tracing::trace!(tag = name, error = %e, "skipping non-commit tag"),
                }
            }

            Ok(tags)
        })
    }
}
