//! Trending Ranker
//!
//! Produces the ordered top-N view over the official registry.

use govwire_core::{Official, TrendingEntry, TrendingSnapshot};

/// Default trending list length
pub const DEFAULT_TRENDING_SIZE: usize = 5;

/// Rank officials by mention count, descending, truncated to `n`.
///
/// Expects `officials` in registration order (as `snapshot_all` returns
/// them); the sort is stable, so ties keep that order and the same registry
/// state always yields the same snapshot.
pub fn rank(officials: &[Official], n: usize) -> TrendingSnapshot {
    let mut entries: Vec<TrendingEntry> = officials.iter().map(TrendingEntry::from).collect();
    entries.sort_by(|a, b| b.mentions_count.cmp(&a.mentions_count));
    entries.truncate(n);
    TrendingSnapshot { officials: entries }
}
