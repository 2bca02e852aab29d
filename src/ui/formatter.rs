//! Pure formatting functions for UI output.
//!
//! Nothing here prints; callers in [crate::ui] decide where text goes.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::{short_sha, ConventionalCommit};

/// Error line for a terminal, in red.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Warning line for a terminal, with a yellow marker.
pub fn format_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Status line with a yellow arrow.
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// One line per commit: short sha, type, scope and a breaking marker
///
/// Only the first line of the message is shown and long descriptions are cut
/// at 60 characters.
pub fn format_commit_line(commit: &ConventionalCommit) -> String {
    let scope = commit
        .scope
        .as_ref()
        .map(|s| format!("({})", s))
        .unwrap_or_default();
    let bang = if commit.breaking { "!" } else { "" };

    let description: String = commit.bare_message.chars().take(60).collect();
    format!(
        "{} {}{}{}: {}",
        short_sha(&commit.sha),
        commit.r#type,
        scope,
        bang,
        description
    )
}

/// Summary of the resolved commit range, at most 10 commits listed.
pub fn format_commit_summary(commits: &[ConventionalCommit], branch_name: &str) -> String {
    let mut lines = vec![format!(
        "{} commit(s) on '{}' since the last release",
        commits.len(),
        branch_name
    )];

    for (i, commit) in commits.iter().take(10).enumerate() {
        lines.push(format!("  {}. {}", i + 1, format_commit_line(commit)));
    }

    if commits.len() > 10 {
        lines.push(format!("  ... and {} more commits", commits.len() - 10));
    }

    lines.join("\n")
}
