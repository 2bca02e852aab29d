//! Release metadata persisted between pipeline steps
//!
//! The upstream release step writes an array of release records. Only
//! `[0].title.version` is read here.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct ReleaseRecord {
    #[serde(default)]
    title: Option<ReleaseTitle>,
}

#[derive(Debug, Deserialize)]
struct ReleaseTitle {
    #[serde(default)]
    version: Option<ReleaseVersion>,
}

/// Version fields of a computed release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(default)]
    pub pre_release: Option<String>,
}

/// Extract the version of the first release record
///
/// # Returns
/// * `Ok(Some(version))` - The first record carries a version
/// * `Ok(None)` - No record, or the record has no version
/// * `Err` - The text is not a JSON array of records
pub fn parse_release_version(json: &str) -> Result<Option<ReleaseVersion>> {
    let records: Vec<ReleaseRecord> = serde_json::from_str(json)?;

    Ok(records
        .into_iter()
        .next()
        .and_then(|record| record.title)
        .and_then(|title| title.version))
}

/// Read a release metadata file and extract its version
pub fn read_release_version(path: impl AsRef<Path>) -> Result<Option<ReleaseVersion>> {
    let content = fs::read_to_string(path)?;
    parse_release_version(&content)
}

/// Dotted version string, e.g. `1.3.2` or `1.3.2.beta`
///
/// The pre-release label is appended as a fourth dotted part, only when
/// present and non-empty.
pub fn format_version(version: &ReleaseVersion) -> String {
    let mut parts = vec![
        version.major.to_string(),
        version.minor.to_string(),
        version.patch.to_string(),
    ];

    if let Some(pre) = version.pre_release.as_deref().filter(|p| !p.is_empty()) {
        parts.push(pre.to_string());
    }

    parts.join(".")
}
