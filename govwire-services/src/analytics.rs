//! Analytics snapshot computation
//!
//! Derived view over the article store and official registry, recomputed each
//! cycle and replaced wholesale. Never persisted separately.

use chrono::{DateTime, Utc};

use govwire_core::AnalyticsSnapshot;

use crate::article_store::{ArticleStore, StoreError};
use crate::official_registry::{OfficialRegistry, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Compute the current analytics snapshot.
///
/// `last_update` is the timestamp of the most recent successful ingestion
/// cycle; repeated fetch failures are observable outward only as this value
/// going stale.
pub fn compute(
    store: &ArticleStore,
    registry: &OfficialRegistry,
    last_update: DateTime<Utc>,
) -> Result<AnalyticsSnapshot, AnalyticsError> {
    Ok(AnalyticsSnapshot {
        total_articles: store.count()?,
        active_departments: store.count_by_department()?.len() as u64,
        featured_officials: registry.featured_count()?,
        last_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use govwire_core::Article;

    fn article(url: &str, department: &str) -> Article {
        Article {
            url: url.to_string(),
            title: "Title".to_string(),
            content: "Content".to_string(),
            department: department.to_string(),
            officials: vec![],
            date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            source: None,
        }
    }

    #[test]
    fn reflects_store_and_registry_state() {
        let store = ArticleStore::new_in_memory().unwrap();
        let registry = OfficialRegistry::new_in_memory().unwrap();
        registry
            .seed(&[("Joe Biden", "Executive"), ("Janet Yellen", "Treasury")])
            .unwrap();

        store.try_insert(&article("https://a", "Executive")).unwrap();
        store.try_insert(&article("https://b", "Executive")).unwrap();
        store.try_insert(&article("https://c", "Treasury")).unwrap();
        registry.increment_mentions("Joe Biden").unwrap();

        let now = Utc::now();
        let snapshot = compute(&store, &registry, now).unwrap();

        assert_eq!(snapshot.total_articles, 3);
        assert_eq!(snapshot.active_departments, 2);
        assert_eq!(snapshot.featured_officials, 1);
        assert_eq!(snapshot.last_update, now);
    }

    #[test]
    fn empty_stores_yield_zeroes() {
        let store = ArticleStore::new_in_memory().unwrap();
        let registry = OfficialRegistry::new_in_memory().unwrap();

        let snapshot = compute(&store, &registry, Utc::now()).unwrap();
        assert_eq!(snapshot.total_articles, 0);
        assert_eq!(snapshot.active_departments, 0);
        assert_eq!(snapshot.featured_officials, 0);
    }
}
