use serde::{Deserialize, Serialize};

/// Pull request associated with a commit (squash or merge commit)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub head_branch_name: String,
    pub base_branch_name: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Raw commit as listed by a repository provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequest>,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Commit {
            sha: sha.into(),
            message: message.into(),
            files: Vec::new(),
            pull_request: None,
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn with_pull_request(mut self, pull_request: PullRequest) -> Self {
        self.pull_request = Some(pull_request);
        self
    }
}

/// First seven characters of a sha, for display
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Footer note attached to a commit, e.g. `BREAKING CHANGE: ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNote {
    pub title: String,
    pub text: String,
}

/// A commit reinterpreted through the conventional commit grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionalCommit {
    pub sha: String,
    pub message: String,
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequest>,
    pub r#type: String,
    pub scope: Option<String>,
    pub bare_message: String,
    pub notes: Vec<CommitNote>,
    pub breaking: bool,
}
