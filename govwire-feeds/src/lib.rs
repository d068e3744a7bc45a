//! RSS fetch collaborator for the GovWire aggregator
//!
//! Turns curated government/politics RSS feeds into `RawArticle` candidates
//! for the ingestion pipeline. The pipeline itself only sees the
//! `ArticleFetcher` trait from `govwire-core`.

pub mod error;
pub mod rss;

pub use error::FeedError;
pub use rss::{get_curated_feeds, RssFeed, RssFetcher};
