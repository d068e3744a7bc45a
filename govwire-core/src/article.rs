//! Article and official data structures for government news aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unvalidated candidate obtained from the fetch collaborator,
/// prior to normalization.
///
/// Every field is optional at this stage; normalization decides what is
/// usable. A candidate missing `url` or `title` is discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    /// Article URL (identity key once normalized)
    pub url: Option<String>,
    /// Article title
    pub title: Option<String>,
    /// Lede/summary text
    pub content: Option<String>,
    /// Government department the article concerns
    pub department: Option<String>,
    /// Official names the provider attributed to the article
    #[serde(default)]
    pub officials: Vec<String>,
    /// Publication date
    pub date: Option<DateTime<Utc>>,
    /// Name of the originating source (e.g. "AP News")
    pub source: Option<String>,
}

/// A normalized, stored news article
///
/// `url` is globally unique across all stored articles. Articles are created
/// by the ingestion cycle on first sighting and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article URL (unique identity key)
    pub url: String,
    /// Article title
    pub title: String,
    /// Lede/summary text
    pub content: String,
    /// Government department the article concerns
    pub department: String,
    /// Official names mentioned, in provider order
    pub officials: Vec<String>,
    /// Publication date
    pub date: DateTime<Utc>,
    /// Name of the originating source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A tracked government official with a mention counter
///
/// The tracked set is closed over the seeded/administered list; officials are
/// never deleted and their counter is monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    /// Official's name (unique identity key)
    pub name: String,
    /// Department the official belongs to
    pub department: String,
    /// Number of articles that have credited this official
    pub mentions_count: u64,
}

/// One row of a trending snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub name: String,
    pub department: String,
    pub mentions_count: u64,
}

impl From<&Official> for TrendingEntry {
    fn from(official: &Official) -> Self {
        Self {
            name: official.name.clone(),
            department: official.department.clone(),
            mentions_count: official.mentions_count,
        }
    }
}

/// Top-N officials ranked by mention count at a point in time
///
/// Ordered by `mentions_count` descending; ties broken by registration order
/// so recomputations are deterministic. Replaced wholesale each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingSnapshot {
    pub officials: Vec<TrendingEntry>,
}

/// Aggregate view over the stores, recomputed each cycle
///
/// Never persisted separately; always reconstructible from the article store
/// and the official registry. `last_update` is the sole outward signal of
/// ingestion health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Total stored articles
    pub total_articles: u64,
    /// Distinct departments across stored articles
    pub active_departments: u64,
    /// Officials with at least one mention credit
    pub featured_officials: u64,
    /// Timestamp of the most recent successful ingestion cycle
    pub last_update: DateTime<Utc>,
}
