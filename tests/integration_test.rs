// tests/integration_test.rs
use release_range::conventional::ConventionalCommitParser;
use release_range::domain::{Commit, PullRequest, Version};
use release_range::find_commits_since_last_release;
use release_range::git::MockRepository;

// Newest first, as the provider returns them.
fn happy_path_commits() -> Vec<Commit> {
    vec![
        // This feature will be released in 1.3.2
        Commit::new("xzy123", "feat(loki): some cool new feature"),
        // Backported release-notes commit for 1.3.1
        Commit::new("abc567", "chore: release 1.3.1").with_pull_request(PullRequest {
            head_branch_name: "release-please/branches/release-1.3.x".to_string(),
            base_branch_name: "release-1.3.x".to_string(),
            number: 123,
            title: "chore: release 1.3.1".to_string(),
            body: String::new(),
            labels: vec![],
            files: vec![],
        }),
        // The commit actually tagged as v1.3.1
        Commit::new("abc123", "bug: a bug fixed in 1.3.1"),
        // Already released in 1.3.1
        Commit::new("def123", "feat: this was released in 1.3.1"),
    ]
}

fn repo_with(commits: Vec<Commit>, tags: &[(&str, &str)]) -> MockRepository {
    let mut repo = MockRepository::new();
    repo.set_branch_commits("release-1.3.x", commits);
    for (name, sha) in tags {
        repo.add_tag(*name, *sha);
    }
    repo
}

fn find(repo: &MockRepository) -> release_range::Result<Vec<release_range::domain::ConventionalCommit>> {
    find_commits_since_last_release(
        repo,
        "release-1.3.x",
        &Version::new(1, 3, 1),
        &ConventionalCommitParser::default(),
    )
}

#[test]
fn test_returns_all_commits_since_the_last_release() {
    let repo = repo_with(happy_path_commits(), &[("v1.3.1", "abc123")]);

    let commits = find(&repo).expect("should resolve commits");
    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas, vec!["xzy123", "abc567"]);
}

#[test]
fn test_returns_empty_when_no_tag_matches_previous_version() {
    let repo = repo_with(
        happy_path_commits(),
        &[("v1.2.1", "abc123"), ("v1.3.2", "abc123")],
    );

    assert!(find(&repo).unwrap().is_empty());
}

#[test]
fn test_returns_empty_when_no_commits_since_previous_release() {
    let repo = repo_with(
        vec![
            Commit::new("abc123", "bug: a bug fixed in 1.3.1"),
            Commit::new("def123", "feat: this was released in 1.3.1"),
        ],
        &[("v1.3.1", "abc123")],
    );

    assert!(find(&repo).unwrap().is_empty());
}

#[test]
fn test_converts_found_commits_to_conventional_commits() {
    let repo = repo_with(happy_path_commits(), &[("v1.3.1", "abc123")]);

    let commits = find(&repo).unwrap();
    assert_eq!(commits.len(), 2);

    let first = &commits[0];
    assert_eq!(first.r#type, "feat");
    assert_eq!(first.scope.as_deref(), Some("loki"));
    assert!(!first.breaking);

    let second = &commits[1];
    assert_eq!(second.r#type, "chore");
    assert_eq!(second.pull_request.as_ref().map(|pr| pr.number), Some(123));
}

#[test]
fn test_every_returned_commit_has_a_type() {
    let repo = repo_with(
        vec![
            Commit::new("c4", "Merge branch 'main' into release-1.3.x"),
            Commit::new("c3", "fix(api)!: drop v1 endpoints"),
            Commit::new("c2", "docs: readme\n\nBREAKING CHANGE: config moved"),
            Commit::new("abc123", "chore: release 1.3.1"),
        ],
        &[("v1.3.1", "abc123")],
    );

    let commits = find(&repo).unwrap();
    assert_eq!(commits.len(), 3);
    assert!(commits.iter().all(|c| !c.r#type.is_empty()));
    assert_eq!(
        commits.iter().map(|c| c.breaking).collect::<Vec<_>>(),
        vec![false, true, true]
    );
}

#[test]
fn test_missing_cutoff_commit_keeps_all_commits() {
    let repo = repo_with(
        vec![
            Commit::new("c2", "fix: b"),
            Commit::new("c1", "feat: a"),
        ],
        &[("v1.3.1", "not-on-this-branch")],
    );

    let commits = find(&repo).unwrap();
    assert_eq!(commits.len(), 2);
}

#[test]
fn test_pre_release_tag_is_not_the_release() {
    let repo = repo_with(happy_path_commits(), &[("v1.3.1-rc.1", "def123")]);
    assert!(find(&repo).unwrap().is_empty());

    let commits = find_commits_since_last_release(
        &repo,
        "release-1.3.x",
        &Version::new(1, 3, 1).with_pre_release("rc.1"),
        &ConventionalCommitParser::default(),
    )
    .unwrap();
    assert_eq!(commits.len(), 3);
}

#[test]
fn test_provider_errors_propagate() {
    let mut repo = repo_with(happy_path_commits(), &[("v1.3.1", "abc123")]);
    repo.fail_tags("Bad credentials");

    let err = find(&repo).unwrap_err();
    assert_eq!(err.to_string(), "GitHub API error: Bad credentials");
}

#[test]
fn test_unknown_branch_propagates() {
    let repo = repo_with(happy_path_commits(), &[("v1.3.1", "abc123")]);

    let result = find_commits_since_last_release(
        &repo,
        "release-9.9.x",
        &Version::new(1, 3, 1),
        &ConventionalCommitParser::default(),
    );
    assert!(result.is_err());
}
