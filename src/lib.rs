pub mod action;
pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod metadata;
pub mod telemetry;
pub mod ui;

pub use analyzer::find_commits_since_last_release;
pub use error::{ReleaseRangeError, Result};
