use crate::error::{ReleaseRangeError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Semantic version of a release, compared structurally
///
/// Two versions are equal only when major, minor, patch and the pre-release
/// label all match. Build metadata is not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_release: Option<String>,
}

impl Version {
    /// Create a new release version without a pre-release label
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// Attach a pre-release label (e.g. "beta.1")
    pub fn with_pre_release(mut self, pre_release: impl Into<String>) -> Self {
        let label = pre_release.into();
        self.pre_release = if label.is_empty() { None } else { Some(label) };
        self
    }

    /// Parse a version string, tolerating a leading 'v' or 'V'
    ///
    /// Accepts `1.3.1`, `v1.3.1` and `1.3.1-beta.1`. Anything that is not a
    /// full `major.minor.patch` triple is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let clean = input.trim().trim_start_matches('v').trim_start_matches('V');

        let parsed = semver::Version::parse(clean).map_err(|e| {
            ReleaseRangeError::version(format!("Invalid version '{}': {}", input, e))
        })?;

        Ok(Version::from(parsed))
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        let pre_release = if v.pre.is_empty() {
            None
        } else {
            Some(v.pre.as_str().to_string())
        };

        Version {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            pre_release,
        }
    }
}

impl FromStr for Version {
    type Err = ReleaseRangeError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}
