use crate::domain::Version;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn re_version_part() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^(?:.*?[-@])?[vV]?(\d+\.\d+\.\d+.*)$").expect("valid tag regex")
    })
}

/// A release tag and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub sha: String,
}

impl Tag {
    /// Create a new tag pointing at a commit sha
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            sha: sha.into(),
        }
    }

    /// Extract the version part of the tag name
    ///
    /// Handles plain tags (`v1.2.3`, `1.2.3`) and component tags
    /// (`web-v1.2.3`, `web@1.2.3`). Returns `None` when nothing that looks
    /// like a version is present.
    pub fn version_part(&self) -> Option<String> {
        re_version_part()
            .captures(&self.name)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Decode the tag name into a semantic version
    pub fn version(&self) -> Option<Version> {
        self.version_part()
            .and_then(|part| Version::parse(&part).ok())
    }

    /// Check whether this tag marks the given release
    pub fn matches_version(&self, version: &Version) -> bool {
        self.version().as_ref() == Some(version)
    }
}
