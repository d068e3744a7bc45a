//! Core types for the GovWire news aggregator
//!
//! This crate defines the shared data structures used across the pipeline,
//! including articles, tracked officials, derived snapshots, the fetch
//! collaborator trait, and the websocket wire protocol.

pub mod article;
pub mod error;
pub mod fetch;
pub mod websocket;

pub use article::{
    AnalyticsSnapshot, Article, Official, RawArticle, TrendingEntry, TrendingSnapshot,
};
pub use error::{FetchError, GovwireError, GovwireResult};
pub use fetch::ArticleFetcher;
pub use websocket::{ClientMessage, ServerMessage};
