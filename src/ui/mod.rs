//! User-facing output.
//!
//! Stdout is reserved for machine-readable results, so everything here goes
//! to stderr. Inside a GitHub Actions runner errors and warnings become
//! workflow-command annotations instead of styled text.

pub mod formatter;

use crate::action;
use crate::boundary::BoundaryWarning;
use crate::domain::ConventionalCommit;

pub use formatter::{format_commit_line, format_commit_summary};

/// Report a fatal error.
pub fn display_error(message: &str) {
    if action::is_github_actions() {
        eprintln!("{}", action::annotation("error", message));
    } else {
        eprintln!("{}", formatter::format_error(message));
    }
}

/// Report a boundary warning.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    if action::is_github_actions() {
        eprintln!("{}", action::annotation("warning", &warning.to_string()));
    } else {
        eprintln!("{}", formatter::format_warning(warning));
    }
}

/// Report progress.
pub fn display_status(message: &str) {
    eprintln!("{}", formatter::format_status(message));
}

/// List the resolved commits.
pub fn display_commit_summary(commits: &[ConventionalCommit], branch_name: &str) {
    eprintln!("{}", format_commit_summary(commits, branch_name));
}
