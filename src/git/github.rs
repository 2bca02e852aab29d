use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::action;
use crate::config::GitHubConfig;
use crate::domain::{Commit, PullRequest, Tag};
use crate::error::{ReleaseRangeError, Result};
use crate::git::{Repository, RepositoryDescriptor};

const USER_AGENT: &str = concat!("release-range/", env!("CARGO_PKG_VERSION"));

const COMMITS_QUERY: &str = r#"
query branchHistory($owner: String!, $repo: String!, $branch: String!, $cursor: String, $perPage: Int!) {
  repository(owner: $owner, name: $repo) {
    ref(qualifiedName: $branch) {
      target {
        ... on Commit {
          history(first: $perPage, after: $cursor) {
            nodes {
              oid
              message
              associatedPullRequests(first: 10) {
                nodes {
                  number
                  title
                  body
                  baseRefName
                  headRefName
                  labels(first: 10) { nodes { name } }
                  mergeCommit { oid }
                  files(first: 100) { nodes { path } }
                }
              }
            }
            pageInfo { hasNextPage endCursor }
          }
        }
      }
    }
  }
}
"#;

/// Split an `owner/repo` string into its two segments
///
/// Anything other than exactly two non-empty segments is a configuration
/// error.
pub fn parse_repo_url(repo_url: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = repo_url.trim().split('/').collect();

    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ReleaseRangeError::config(format!(
            "repoUrl must be in the form owner/repo, got '{}'",
            repo_url
        ))),
    }
}

/// Build an authenticated GitHub client from the action inputs
///
/// Reads `repoUrl` and `token`. Nothing is constructed when either input is
/// missing or `repoUrl` is malformed.
pub fn create_github_instance(
    default_branch: &str,
    config: &GitHubConfig,
) -> Result<GitHubRepository> {
    let repo_url = action::get_required_input("repoUrl")?;
    let token = action::get_required_input("token")?;
    let (owner, repo) = parse_repo_url(&repo_url)?;

    Ok(GitHubRepository::new(
        RepositoryDescriptor::new(owner, repo, default_branch),
        token,
        config.clone(),
    ))
}

/// GitHub provider backed by the REST (tags) and GraphQL (history) APIs
pub struct GitHubRepository {
    agent: ureq::Agent,
    token: String,
    descriptor: RepositoryDescriptor,
    config: GitHubConfig,
    max_commits: Option<usize>,
}

impl GitHubRepository {
    pub fn new(descriptor: RepositoryDescriptor, token: String, config: GitHubConfig) -> Self {
        GitHubRepository {
            agent: ureq::Agent::new_with_defaults(),
            token,
            descriptor,
            config,
            max_commits: None,
        }
    }

    /// Stop paging history after this many commits
    pub fn with_max_commits(mut self, max_commits: Option<usize>) -> Self {
        self.max_commits = max_commits;
        self
    }

    /// Use a preconfigured HTTP agent (proxy, timeouts)
    pub fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }

    /// Page size sent to both APIs; GitHub caps it at 100
    fn page_size(&self) -> u32 {
        self.config.per_page.clamp(1, 100)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET");
        let body = self
            .agent
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| status_error(url, e))?
            .into_body()
            .read_to_string()?;

        Ok(serde_json::from_str(&body)?)
    }

    fn graphql<T: DeserializeOwned>(&self, variables: serde_json::Value) -> Result<T> {
        tracing::debug!(%variables, "POST graphql");
        let payload = json!({ "query": COMMITS_QUERY, "variables": variables }).to_string();

        let body = self
            .agent
            .post(&self.config.graphql_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .send(payload.as_str())
            .map_err(|e| status_error(&self.config.graphql_url, e))?
            .into_body()
            .read_to_string()?;

        let response: GraphQlResponse<T> = serde_json::from_str(&body)?;
        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(ReleaseRangeError::api(messages.join("; ")));
        }
        response
            .data
            .ok_or_else(|| ReleaseRangeError::api("GraphQL response carried no data"))
    }
}

impl Repository for GitHubRepository {
    fn repository(&self) -> &RepositoryDescriptor {
        &self.descriptor
    }

    fn list_commits_on_branch(&self, branch_name: &str) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: HistoryData = self.graphql(json!({
                "owner": self.descriptor.owner,
                "repo": self.descriptor.repo,
                "branch": format!("refs/heads/{}", branch_name),
                "cursor": cursor,
                "perPage": self.page_size(),
            }))?;

            let history = data
                .repository
                .and_then(|r| r.git_ref)
                .map(|r| r.target.history)
                .ok_or_else(|| {
                    ReleaseRangeError::api(format!(
                        "Branch '{}' not found in {}",
                        branch_name,
                        self.descriptor.full_name()
                    ))
                })?;

            let next = next_page_cursor(&history.page_info)?;
            commits.extend(commits_from_history(history));

            if let Some(max) = self.max_commits {
                if commits.len() >= max {
                    commits.truncate(max);
                    tracing::debug!(max, "stopped fetching history at max_commits");
                    break;
                }
            }
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = commits.len(), branch = branch_name, "fetched commits");
        Ok(commits)
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        let per_page = self.page_size() as usize;
        let mut tags = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/repos/{}/tags?per_page={}&page={}",
                self.config.api_url.trim_end_matches('/'),
                self.descriptor.full_name(),
                per_page,
                page
            );
            let batch: Vec<TagResponse> = self.get_json(&url)?;
            let last_page = batch.len() < per_page;

            tags.extend(batch.into_iter().map(|t| Tag::new(t.name, t.commit.sha)));
            if last_page {
                break;
            }
        }

        tracing::debug!(count = tags.len(), "fetched tags");
        Ok(tags)
    }
}

/// Non-2xx responses are API errors; transport failures stay HTTP errors
fn status_error(url: &str, err: ureq::Error) -> ReleaseRangeError {
    match err {
        ureq::Error::StatusCode(code) => {
            ReleaseRangeError::api(format!("{} responded with HTTP {}", url, code))
        }
        other => other.into(),
    }
}

/// Cursor of the next history page, `None` on the last page
///
/// A page that claims more history but carries no cursor would restart from
/// the first page, so it is an API error.
fn next_page_cursor(page_info: &PageInfo) -> Result<Option<String>> {
    if !page_info.has_next_page {
        return Ok(None);
    }
    match &page_info.end_cursor {
        Some(cursor) if !cursor.is_empty() => Ok(Some(cursor.clone())),
        _ => Err(ReleaseRangeError::api(
            "History page reported more commits without an end cursor",
        )),
    }
}

/// Convert one page of GraphQL history into commits
///
/// A commit's pull request is the associated PR whose merge commit is that
/// commit; the PR's files stand in for the commit's files.
pub fn commits_from_history(history: HistoryNode) -> Vec<Commit> {
    history
        .nodes
        .into_iter()
        .map(|node| {
            let sha = node.oid;
            let pull_request = node
                .associated_pull_requests
                .nodes
                .into_iter()
                .find(|pr| pr.merge_commit.as_ref().map(|c| c.oid.as_str()) == Some(sha.as_str()))
                .map(PullRequest::from);

            let files = pull_request
                .as_ref()
                .map(|pr| pr.files.clone())
                .unwrap_or_default();

            Commit {
                sha,
                message: node.message,
                files,
                pull_request,
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
    commit: TagCommit,
}

#[derive(Debug, Deserialize)]
struct TagCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    #[serde(rename = "ref")]
    git_ref: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
struct RefNode {
    target: TargetNode,
}

#[derive(Debug, Deserialize)]
struct TargetNode {
    history: HistoryNode,
}

/// One page of a branch history as returned by GraphQL
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryNode {
    nodes: Vec<CommitNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Connection { nodes: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    oid: String,
    message: String,
    #[serde(default)]
    associated_pull_requests: Connection<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    #[serde(default)]
    body: String,
    base_ref_name: String,
    head_ref_name: String,
    #[serde(default)]
    labels: Connection<NameNode>,
    merge_commit: Option<OidNode>,
    #[serde(default)]
    files: Option<Connection<PathNode>>,
}

#[derive(Debug, Deserialize)]
struct NameNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OidNode {
    oid: String,
}

#[derive(Debug, Deserialize)]
struct PathNode {
    path: String,
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        PullRequest {
            head_branch_name: node.head_ref_name,
            base_branch_name: node.base_ref_name,
            number: node.number,
            title: node.title,
            body: node.body,
            labels: node.labels.nodes.into_iter().map(|l| l.name).collect(),
            files: node
                .files
                .unwrap_or_default()
                .nodes
                .into_iter()
                .map(|f| f.path)
                .collect(),
        }
    }
}
