//! Error types shared across the aggregator

use thiserror::Error;

/// Aggregator-wide error type
#[derive(Error, Debug)]
pub enum GovwireError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed candidate: {0}")]
    MalformedCandidate(String),

    #[error("Unknown official: {0}")]
    UnknownOfficial(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GovwireError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        GovwireError::Fetch(msg.into())
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        GovwireError::StorageUnavailable(msg.into())
    }

    pub fn malformed_candidate(msg: impl Into<String>) -> Self {
        GovwireError::MalformedCandidate(msg.into())
    }

    pub fn unknown_official(name: impl Into<String>) -> Self {
        GovwireError::UnknownOfficial(name.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        GovwireError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        GovwireError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GovwireError::Internal(msg.into())
    }
}

/// Result type alias for aggregator operations
pub type GovwireResult<T> = Result<T, GovwireError>;

/// Failure of the external fetch collaborator.
///
/// Transient by contract: the ingestion cycle that observes one skips the
/// tick and leaves all stored state untouched; the next timer tick retries.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
