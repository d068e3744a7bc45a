//! Fetch collaborator seam
//!
//! The ingestion pipeline consumes raw candidates through this trait and is
//! agnostic to how any particular provider is spoken to.

use async_trait::async_trait;

use crate::article::RawArticle;
use crate::error::FetchError;

/// Source of raw article candidates.
///
/// Implementations talk to the outside world (RSS feeds, provider APIs);
/// the pipeline only sees the resulting candidate batch. An `Err` means the
/// whole batch is unavailable and the current ingestion cycle is skipped.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch_raw(&self) -> Result<Vec<RawArticle>, FetchError>;
}
