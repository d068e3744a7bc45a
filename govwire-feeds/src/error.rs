//! Error types for the feeds module

use thiserror::Error;

/// Errors that can occur while fetching a single feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Feed endpoint returned a non-success status
    #[error("Feed error (status {status}): {url}")]
    BadStatus {
        /// HTTP status code
        status: u16,
        /// Feed URL
        url: String,
    },

    /// Failed to parse the feed body
    #[error("Parse error: {0}")]
    ParseError(String),
}
