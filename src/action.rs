//! GitHub Actions runtime plumbing
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, outputs are
//! appended to the file named by `$GITHUB_OUTPUT`, and annotations are
//! workflow commands written to the log.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use rand::Rng;

use crate::error::{ReleaseRangeError, Result};

/// Environment variable that holds an action input
///
/// Spaces become underscores and the name is uppercased, so `repoUrl` is
/// read from `INPUT_REPOURL`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read an action input, `None` when unset or blank
pub fn get_input(name: &str) -> Option<String> {
    env::var(input_env_name(name))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read an action input that must be supplied
pub fn get_required_input(name: &str) -> Result<String> {
    get_input(name).ok_or_else(|| {
        ReleaseRangeError::config(format!("Input required and not supplied: {}", name))
    })
}

/// True when running inside a GitHub Actions runner
pub fn is_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// True when the workflow was re-run with debug logging enabled
pub fn is_debug() -> bool {
    env::var("RUNNER_DEBUG").map(|v| v == "1").unwrap_or(false)
}

/// Append a step output to `$GITHUB_OUTPUT`
///
/// Does nothing when the variable is unset, so the binary also runs outside
/// of Actions.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    let Some(path) = env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_output(name, value)?.as_bytes())?;
    Ok(())
}

/// Render an output in the multiline `name<<DELIMITER` form
///
/// The delimiter carries a random suffix so that commit text cannot end the
/// value early.
pub fn format_output(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{:032x}", rand::rng().random::<u128>());
    render_output(name, value, &delimiter)
}

fn render_output(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(ReleaseRangeError::config(format!(
            "Output '{}' contains the delimiter {}",
            name, delimiter
        )));
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Workflow command line for an annotation (`error`, `warning`, `notice`)
pub fn annotation(level: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{}::{}", level, escaped)
}
