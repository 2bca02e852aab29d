use thiserror::Error;

/// Unified error type for release-range operations
#[derive(Error, Debug)]
pub enum ReleaseRangeError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-range
pub type Result<T> = std::result::Result<T, ReleaseRangeError>;

impl ReleaseRangeError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseRangeError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseRangeError::Version(msg.into())
    }

    /// Create a GitHub API error with context
    pub fn api(msg: impl Into<String>) -> Self {
        ReleaseRangeError::Api(msg.into())
    }
}
