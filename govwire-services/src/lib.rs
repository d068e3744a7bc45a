//! Pipeline services for the GovWire news aggregator
//!
//! This crate implements the ingestion-dedup-ranking-broadcast pipeline:
//! durable article and official storage, mention scoring, trending ranking,
//! the periodic ingestion cycle, and real-time fanout to subscribers.

pub mod analytics;
pub mod article_store;
pub mod broadcast;
pub mod ingestion;
pub mod mention_scorer;
pub mod official_registry;
pub mod trending;

pub use analytics::AnalyticsError;
pub use article_store::{ArticleStore, InsertOutcome, StoreError};
pub use broadcast::{BroadcastHub, ClientId};
pub use ingestion::{CycleError, CycleOutcome, CycleReport, CycleState, IngestionConfig, IngestionCycle};
pub use official_registry::{OfficialRegistry, RegistryError};
pub use trending::{rank, DEFAULT_TRENDING_SIZE};
