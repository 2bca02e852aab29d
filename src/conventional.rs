//! Conventional commit parsing
//!
//! Turns raw provider commits into [ConventionalCommit] records. Squash and
//! merge commits are expanded through their pull request metadata: a PR body
//! may override the commit message, and a message may carry several nested
//! commits.

use std::sync::OnceLock;

use crate::config::ConventionalCommitsConfig;
use crate::domain::{Commit, CommitNote, ConventionalCommit};

const COMMIT_OVERRIDE_START: &str = "BEGIN_COMMIT_OVERRIDE";
const COMMIT_OVERRIDE_END: &str = "END_COMMIT_OVERRIDE";
const NESTED_COMMIT_START: &str = "BEGIN_NESTED_COMMIT";
const NESTED_COMMIT_END: &str = "END_NESTED_COMMIT";

fn re_header() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^([a-zA-Z]+)(?:\(([^)]*)\))?(!)?:\s*(.*)$")
            .expect("valid conventional header regex")
    })
}

/// Type assigned to messages that do not follow the conventional grammar.
pub const FALLBACK_TYPE: &str = "chore";

/// Capability turning one raw commit into conventional commits
///
/// A single raw commit can produce several conventional commits when its
/// message contains nested commit blocks. Implementations never drop a commit
/// entirely.
pub trait CommitParser: Send + Sync {
    fn parse(&self, commit: &Commit) -> Vec<ConventionalCommit>;
}

/// Parsed representation of a single conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
    pub notes: Vec<CommitNote>,
}

/// Parse a commit message according to the conventional commits grammar
///
/// Supports formats:
/// - type(scope)!: description
/// - type(scope): description
/// - type!: description
/// - type: description
/// - non-conventional text (typed as `chore`)
///
/// Footer lines starting with one of `breaking_indicators` mark the commit
/// as breaking and become notes.
pub fn parse_conventional_commit(message: &str, breaking_indicators: &[String]) -> ParsedCommit {
    let header = message.lines().next().unwrap_or_default();
    let body: Vec<&str> = message.lines().skip(1).collect();

    let mut notes = breaking_notes(&body, breaking_indicators);

    let Some(captures) = re_header().captures(header) else {
        return ParsedCommit {
            r#type: FALLBACK_TYPE.to_string(),
            scope: None,
            description: header.trim().to_string(),
            is_breaking_change: !notes.is_empty(),
            notes,
        };
    };

    let r#type = captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_TYPE.to_string());
    let scope = captures
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());
    let has_exclamation = captures.get(3).is_some();
    let description = captures
        .get(4)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    if has_exclamation && notes.is_empty() {
        notes.push(CommitNote {
            title: "BREAKING CHANGE".to_string(),
            text: description.clone(),
        });
    }

    ParsedCommit {
        r#type,
        scope,
        description,
        is_breaking_change: has_exclamation || !notes.is_empty(),
        notes,
    }
}

/// Collect breaking change footers; each note spans the rest of its paragraph.
fn breaking_notes(body: &[&str], indicators: &[String]) -> Vec<CommitNote> {
    let mut notes: Vec<CommitNote> = Vec::new();
    let mut open = false;

    for line in body {
        if let Some(indicator) = indicators.iter().find(|i| line.starts_with(i.as_str())) {
            notes.push(CommitNote {
                title: indicator.trim_end_matches(':').trim().to_string(),
                text: line[indicator.len()..].trim().to_string(),
            });
            open = true;
        } else if line.trim().is_empty() {
            open = false;
        } else if open {
            if let Some(note) = notes.last_mut() {
                if !note.text.is_empty() {
                    note.text.push('\n');
                }
                note.text.push_str(line.trim());
            }
        }
    }

    notes
}

/// Normalise line endings and surrounding whitespace
fn normalize(message: &str) -> String {
    message.replace("\r\n", "\n").trim().to_string()
}

/// Message override carried in the body of the commit's pull request
fn override_message(commit: &Commit) -> Option<String> {
    let body = &commit.pull_request.as_ref()?.body;
    let start = body.find(COMMIT_OVERRIDE_START)? + COMMIT_OVERRIDE_START.len();
    let rest = &body[start..];
    let end = rest.find(COMMIT_OVERRIDE_END).unwrap_or(rest.len());

    let message = normalize(&rest[..end]);
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Split a message into its leading text and nested commit blocks
///
/// Text following an `END_NESTED_COMMIT` marker is discarded.
pub fn split_messages(message: &str) -> Vec<String> {
    let mut parts = message.split(NESTED_COMMIT_START);
    let mut messages = Vec::new();

    if let Some(leading) = parts.next() {
        messages.push(normalize(leading));
    }
    for part in parts {
        let nested = part.split(NESTED_COMMIT_END).next().unwrap_or_default();
        messages.push(normalize(nested));
    }

    messages.retain(|m| !m.is_empty());
    messages
}

/// Production parser following the conventional commits grammar
#[derive(Debug, Clone, Default)]
pub struct ConventionalCommitParser {
    config: ConventionalCommitsConfig,
}

impl ConventionalCommitParser {
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        ConventionalCommitParser { config }
    }

    fn to_conventional(&self, commit: &Commit, message: String) -> ConventionalCommit {
        let parsed = parse_conventional_commit(&message, &self.config.breaking_change_indicators);

        ConventionalCommit {
            sha: commit.sha.clone(),
            message,
            files: commit.files.clone(),
            pull_request: commit.pull_request.clone(),
            r#type: parsed.r#type,
            scope: parsed.scope,
            bare_message: parsed.description,
            notes: parsed.notes,
            breaking: parsed.is_breaking_change,
        }
    }
}

impl CommitParser for ConventionalCommitParser {
    fn parse(&self, commit: &Commit) -> Vec<ConventionalCommit> {
        let message = override_message(commit).unwrap_or_else(|| normalize(&commit.message));

        let mut messages = split_messages(&message);
        if messages.is_empty() {
            messages.push(message);
        }

        messages
            .into_iter()
            .map(|m| self.to_conventional(commit, m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PullRequest;

    fn indicators() -> Vec<String> {
        ConventionalCommitsConfig::default().breaking_change_indicators
    }

    #[test]
    fn test_parse_with_scope() {
        let commit = parse_conventional_commit("feat(loki): some cool new feature", &indicators());
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, Some("loki".to_string()));
        assert_eq!(commit.description, "some cool new feature");
        assert!(!commit.is_breaking_change);
        assert!(commit.notes.is_empty());
    }

    #[test]
    fn test_parse_with_breaking_marker() {
        let commit = parse_conventional_commit("feat(auth)!: redesign login", &indicators());
        assert_eq!(commit.r#type, "feat");
        assert!(commit.is_breaking_change);
        assert_eq!(commit.notes[0].title, "BREAKING CHANGE");
        assert_eq!(commit.notes[0].text, "redesign login");
    }

    #[test]
    fn test_parse_breaking_without_scope() {
        let commit = parse_conventional_commit("feat!: redesign", &indicators());
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, None);
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_parse_empty_scope() {
        let commit = parse_conventional_commit("fix(): tidy", &indicators());
        assert_eq!(commit.r#type, "fix");
        assert_eq!(commit.scope, None);
    }

    #[test]
    fn test_parse_non_conventional() {
        let commit = parse_conventional_commit("Random commit message", &indicators());
        assert_eq!(commit.r#type, "chore");
        assert_eq!(commit.description, "Random commit message");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_breaking_change_footer() {
        let commit = parse_conventional_commit(
            "fix: something\n\nBREAKING CHANGE: field renamed\nfrom X to Y\n\nRefs: #12",
            &indicators(),
        );
        assert!(commit.is_breaking_change);
        assert_eq!(commit.notes.len(), 1);
        assert_eq!(commit.notes[0].text, "field renamed\nfrom X to Y");
    }

    #[test]
    fn test_parse_hyphenated_footer() {
        let commit =
            parse_conventional_commit("fix: x\n\nBREAKING-CHANGE: dropped v1 API", &indicators());
        assert!(commit.is_breaking_change);
        assert_eq!(commit.notes[0].title, "BREAKING-CHANGE");
    }

    #[test]
    fn test_footer_only_in_header_is_not_breaking() {
        let commit = parse_conventional_commit("docs: explain BREAKING CHANGE: policy", &indicators());
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_split_messages_nested() {
        let message = "chore: sync deps\n\nBEGIN_NESTED_COMMIT\nfix(api): handle nulls\nEND_NESTED_COMMIT\nBEGIN_NESTED_COMMIT\nfeat: add search\nEND_NESTED_COMMIT\ntrailing text";
        assert_eq!(
            split_messages(message),
            vec!["chore: sync deps", "fix(api): handle nulls", "feat: add search"]
        );
    }

    #[test]
    fn test_split_messages_only_nested() {
        let message = "BEGIN_NESTED_COMMIT\nfix: one\nEND_NESTED_COMMIT";
        assert_eq!(split_messages(message), vec!["fix: one"]);
    }

    #[test]
    fn test_parser_uses_pr_override() {
        let commit = Commit::new("abc", "Merge pull request #9").with_pull_request(PullRequest {
            number: 9,
            body: "Details\n\nBEGIN_COMMIT_OVERRIDE\nfeat(ui)!: new layout\nEND_COMMIT_OVERRIDE\n"
                .to_string(),
            ..Default::default()
        });

        let parsed = ConventionalCommitParser::default().parse(&commit);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].r#type, "feat");
        assert_eq!(parsed[0].scope, Some("ui".to_string()));
        assert!(parsed[0].breaking);
        assert_eq!(parsed[0].message, "feat(ui)!: new layout");
    }

    #[test]
    fn test_parser_expands_nested_commits_with_same_sha() {
        let commit = Commit::new(
            "def",
            "feat: parent\n\nBEGIN_NESTED_COMMIT\nfix: child\nEND_NESTED_COMMIT",
        )
        .with_files(vec!["src/lib.rs".to_string()]);

        let parsed = ConventionalCommitParser::default().parse(&commit);
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|c| c.sha == "def"));
        assert!(parsed.iter().all(|c| c.files == vec!["src/lib.rs"]));
        assert_eq!(parsed[1].r#type, "fix");
    }

    #[test]
    fn test_parser_keeps_empty_message() {
        let parsed = ConventionalCommitParser::default().parse(&Commit::new("e", "  \r\n"));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].r#type, "chore");
    }

    #[test]
    fn test_parser_normalizes_crlf() {
        let parsed = ConventionalCommitParser::default()
            .parse(&Commit::new("c", "fix: a\r\n\r\nBREAKING CHANGE: b\r\n"));
        assert!(parsed[0].breaking);
        assert_eq!(parsed[0].notes[0].text, "b");
    }
}
