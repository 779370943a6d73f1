//! Failures of the issue-tracker boundary.

use thiserror::Error;

/// Errors raised while talking to the issue-tracking service.
#[derive(Error, Debug)]
pub enum JiraError {
    /// Request construction or network failure.
    #[error("Request to issue tracker failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Issue tracker returned HTTP {status}: {body}")]
    RemoteService {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response payload could not be decoded.
    #[error("Could not decode issue tracker response: {0}")]
    Decode(String),

    /// The key does not resolve to any issue.
    #[error("Issue not found: {key}")]
    NotFound {
        /// The requested issue key.
        key: String,
    },

    /// The query expression was rejected before sending.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl JiraError {
    /// Whether linkage discovery may log this failure and move on to the next strategy.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RemoteService { .. } | Self::Decode(_) | Self::NotFound { .. }
        )
    }
}

/// Result type for issue-tracker operations.
pub type JiraResult<T> = std::result::Result<T, JiraError>;
