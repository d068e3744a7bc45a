//! Ingestion Cycle
//!
//! Timer-driven driver of the fetch → dedup → score → rank → publish
//! pipeline. Cycles are single-flight: a trigger arriving while a cycle is
//! in flight is a no-op. A fetch failure skips the whole tick with no state
//! mutation; a malformed individual candidate is discarded without aborting
//! the batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex as StateMutex, RwLock};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use govwire_core::{Article, ArticleFetcher, GovwireError, RawArticle, ServerMessage};

use crate::analytics::{self, AnalyticsError};
use crate::article_store::{ArticleStore, InsertOutcome, StoreError};
use crate::broadcast::BroadcastHub;
use crate::mention_scorer;
use crate::official_registry::{OfficialRegistry, RegistryError};
use crate::trending;

/// Configuration for the ingestion cycle driver
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Interval between timer-driven cycles (in seconds)
    pub poll_interval_secs: u64,
    /// Trending list length
    pub trending_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            trending_size: trending::DEFAULT_TRENDING_SIZE,
        }
    }
}

/// Observable phase of the cycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Processing,
    Publishing,
}

/// What a single trigger accomplished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion
    Completed(CycleReport),
    /// Another cycle was in flight; this trigger was a no-op
    SkippedInFlight,
    /// The fetch collaborator failed; the tick was skipped with no state
    /// mutation, the next tick retries
    FetchFailed,
}

/// Per-cycle accounting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Raw candidates returned by the fetch collaborator
    pub fetched: usize,
    /// Candidates discarded during normalization
    pub discarded: usize,
    /// Candidates rejected as already-stored URLs
    pub duplicates: usize,
    /// Articles stored for the first time this cycle
    pub inserted: usize,
    /// Mention credits applied across the new articles
    pub credited: usize,
}

/// Storage-layer failure during a cycle. Retryable: the next tick runs a
/// fresh cycle against the same stores.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Periodic driver of the ingestion pipeline
pub struct IngestionCycle {
    fetcher: Arc<dyn ArticleFetcher>,
    store: ArticleStore,
    registry: OfficialRegistry,
    hub: Arc<BroadcastHub>,
    config: IngestionConfig,
    /// Observable state machine phase
    state: StateMutex<CycleState>,
    /// Single-flight guard: holding this lock is being the one running cycle
    in_flight: tokio::sync::Mutex<()>,
    /// Timestamp of the most recent successful cycle
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl IngestionCycle {
    pub fn new(
        fetcher: Arc<dyn ArticleFetcher>,
        store: ArticleStore,
        registry: OfficialRegistry,
        hub: Arc<BroadcastHub>,
        config: IngestionConfig,
    ) -> Self {
        info!(
            "Initializing ingestion cycle with {}s interval",
            config.poll_interval_secs
        );
        Self {
            fetcher,
            store,
            registry,
            hub,
            config,
            state: StateMutex::new(CycleState::Idle),
            in_flight: tokio::sync::Mutex::new(()),
            last_update: RwLock::new(None),
        }
    }

    /// Current state machine phase
    pub fn state(&self) -> CycleState {
        *self.state.lock()
    }

    /// Timestamp of the most recent successful cycle, if any
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.read()
    }

    fn set_state(&self, next: CycleState) {
        *self.state.lock() = next;
    }

    /// Run the timer loop. The first tick fires immediately, so the store is
    /// populated shortly after startup.
    pub async fn start(self: Arc<Self>) {
        let mut ticker = interval(Duration::from_secs(self.config.poll_interval_secs));

        loop {
            ticker.tick().await;
            match self.run_once().await {
                Ok(CycleOutcome::Completed(report)) => {
                    debug!(
                        "Cycle complete: {} fetched, {} inserted, {} duplicates, {} discarded",
                        report.fetched, report.inserted, report.duplicates, report.discarded
                    );
                }
                Ok(CycleOutcome::SkippedInFlight) | Ok(CycleOutcome::FetchFailed) => {}
                Err(e) => error!("Ingestion cycle failed: {}", e),
            }
        }
    }

    /// Run a single cycle: Fetching → Processing → Publishing → Idle.
    ///
    /// Safe to call from any task at any time; if a cycle is already in
    /// flight the trigger returns `SkippedInFlight` without waiting.
    pub async fn run_once(&self) -> Result<CycleOutcome, CycleError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Ingestion cycle already in flight, trigger is a no-op");
            return Ok(CycleOutcome::SkippedInFlight);
        };

        self.set_state(CycleState::Fetching);
        let candidates = match self.fetcher.fetch_raw().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Fetch failed, skipping cycle: {}", e);
                self.set_state(CycleState::Idle);
                return Ok(CycleOutcome::FetchFailed);
            }
        };

        let result = self.process_and_publish(candidates).await;
        self.set_state(CycleState::Idle);
        result.map(CycleOutcome::Completed)
    }

    async fn process_and_publish(
        &self,
        candidates: Vec<RawArticle>,
    ) -> Result<CycleReport, CycleError> {
        self.set_state(CycleState::Processing);

        let mut report = CycleReport {
            fetched: candidates.len(),
            ..CycleReport::default()
        };
        let mut new_articles: Vec<Article> = Vec::new();

        for raw in candidates {
            let article = match normalize(raw) {
                Ok(article) => article,
                Err(e) => {
                    debug!("Discarding candidate: {}", e);
                    report.discarded += 1;
                    continue;
                }
            };

            match self.store.try_insert(&article)? {
                InsertOutcome::Inserted => new_articles.push(article),
                InsertOutcome::AlreadyExists => report.duplicates += 1,
            }
        }
        report.inserted = new_articles.len();

        let tracked = self.registry.tracked_names()?;
        for article in &new_articles {
            report.credited += mention_scorer::credit_mentions(article, &tracked, &self.registry)?;
        }

        self.set_state(CycleState::Publishing);

        let now = Utc::now();
        let snapshot = self.registry.snapshot_all()?;
        let trending = trending::rank(&snapshot, self.config.trending_size);
        let analytics = analytics::compute(&self.store, &self.registry, now)?;
        *self.last_update.write() = Some(now);

        if !new_articles.is_empty() {
            info!("Broadcasting {} new articles", new_articles.len());
            self.hub.publish(ServerMessage::ArticlesNew {
                articles: new_articles,
            });
        }
        self.hub.publish(ServerMessage::TrendingUpdate { trending });
        self.hub.publish(ServerMessage::AnalyticsUpdate { analytics });

        Ok(report)
    }
}

/// Normalize a raw candidate into a storable article.
///
/// Trims every textual field. A candidate missing `url` or `title` is
/// malformed and discarded; missing content, department, date, or source
/// degrade to defaults.
fn normalize(raw: RawArticle) -> Result<Article, GovwireError> {
    let url = raw
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| GovwireError::malformed_candidate("missing url"))?
        .to_string();

    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GovwireError::malformed_candidate(format!("missing title for {url}")))?
        .to_string();

    Ok(Article {
        url,
        title,
        content: raw
            .content
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        department: raw
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("General")
            .to_string(),
        officials: raw
            .officials
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect(),
        date: raw.date.unwrap_or_else(Utc::now),
        source: raw
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use govwire_core::FetchError;
    use parking_lot::Mutex;

    /// Fetcher returning canned batches, one per call
    struct ScriptedFetcher {
        batches: Mutex<Vec<Result<Vec<RawArticle>, FetchError>>>,
        delay: Option<Duration>,
    }

    impl ScriptedFetcher {
        fn new(batches: Vec<Result<Vec<RawArticle>, FetchError>>) -> Self {
            Self {
                batches: Mutex::new(batches),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait::async_trait]
    impl ArticleFetcher for ScriptedFetcher {
        async fn fetch_raw(&self) -> Result<Vec<RawArticle>, FetchError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let mut batches = self.batches.lock();
            if batches.is_empty() {
                Ok(vec![])
            } else {
                batches.remove(0)
            }
        }
    }

    fn raw(url: &str, title: &str, content: &str) -> RawArticle {
        RawArticle {
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            department: Some("Executive".to_string()),
            officials: vec![],
            date: Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
            source: Some("Test Wire".to_string()),
        }
    }

    fn pipeline(
        fetcher: Arc<dyn ArticleFetcher>,
    ) -> (Arc<IngestionCycle>, ArticleStore, OfficialRegistry) {
        let store = ArticleStore::new_in_memory().unwrap();
        let registry = OfficialRegistry::new_in_memory().unwrap();
        registry
            .seed(&[("Joe Biden", "Executive"), ("Janet Yellen", "Treasury")])
            .unwrap();

        let cycle = Arc::new(IngestionCycle::new(
            fetcher,
            store.clone(),
            registry.clone(),
            Arc::new(BroadcastHub::new()),
            IngestionConfig::default(),
        ));
        (cycle, store, registry)
    }

    #[tokio::test]
    async fn seeded_scenario_credits_once_and_dedups() {
        // One fresh article mentioning Joe Biden three times across title and
        // content, plus one duplicate of an already-stored URL.
        let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(vec![
            raw(
                "https://example.com/fresh",
                "Joe Biden addresses the nation",
                "Joe Biden spoke at length. Joe Biden then departed.",
            ),
            raw("https://example.com/stored", "Old news", "Nothing here"),
        ])]));
        let (cycle, store, registry) = pipeline(fetcher);

        // Pre-store the duplicate target
        let existing = normalize(raw("https://example.com/stored", "Old news", "Nothing here"))
            .unwrap();
        store.try_insert(&existing).unwrap();

        let CycleOutcome::Completed(report) = cycle.run_once().await.unwrap() else {
            panic!("expected completed cycle");
        };

        assert_eq!(report.fetched, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.credited, 1);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(registry.mentions_count("Joe Biden").unwrap(), 1);

        let snapshot = registry.snapshot_all().unwrap();
        let trending = trending::rank(&snapshot, 5);
        assert_eq!(trending.officials[0].name, "Joe Biden");
        assert_eq!(trending.officials[0].mentions_count, 1);
        assert_eq!(trending.officials[1].name, "Janet Yellen");
        assert_eq!(trending.officials[1].mentions_count, 0);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_state_untouched() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![Err(FetchError::Network(
            "connection refused".to_string(),
        ))]));
        let (cycle, store, registry) = pipeline(fetcher);

        let articles_before = store.list_all().unwrap();
        let officials_before = registry.snapshot_all().unwrap();

        let outcome = cycle.run_once().await.unwrap();
        assert_eq!(outcome, CycleOutcome::FetchFailed);

        assert_eq!(store.list_all().unwrap(), articles_before);
        assert_eq!(registry.snapshot_all().unwrap(), officials_before);
        assert_eq!(cycle.last_update(), None);
        assert_eq!(cycle.state(), CycleState::Idle);
    }

    #[tokio::test]
    async fn malformed_candidate_does_not_abort_the_batch() {
        let mut missing_url = raw("", "Has a title", "content");
        missing_url.url = None;
        let missing_title = RawArticle {
            title: None,
            ..raw("https://example.com/untitled", "x", "content")
        };

        let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(vec![
            missing_url,
            raw("https://example.com/good", "Janet Yellen speaks", "on rates"),
            missing_title,
        ])]));
        let (cycle, store, registry) = pipeline(fetcher);

        let CycleOutcome::Completed(report) = cycle.run_once().await.unwrap() else {
            panic!("expected completed cycle");
        };

        assert_eq!(report.discarded, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(registry.mentions_count("Janet Yellen").unwrap(), 1);
    }

    #[tokio::test]
    async fn repeat_cycles_do_not_recredit_stored_articles() {
        let batch = vec![raw(
            "https://example.com/a",
            "Janet Yellen testifies",
            "hearing coverage",
        )];
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            Ok(batch.clone()),
            Ok(batch),
        ]));
        let (cycle, store, registry) = pipeline(fetcher);

        cycle.run_once().await.unwrap();
        cycle.run_once().await.unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(registry.mentions_count("Janet Yellen").unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_trigger_is_a_no_op() {
        let fetcher = Arc::new(
            ScriptedFetcher::new(vec![Ok(vec![])]).with_delay(Duration::from_millis(200)),
        );
        let (cycle, _store, _registry) = pipeline(fetcher);

        let background = {
            let cycle = Arc::clone(&cycle);
            tokio::spawn(async move { cycle.run_once().await.unwrap() })
        };

        // Give the background cycle time to take the guard and enter its
        // fetch delay, then trigger again.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = cycle.run_once().await.unwrap();
        assert_eq!(second, CycleOutcome::SkippedInFlight);

        let first = background.await.unwrap();
        assert!(matches!(first, CycleOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn successful_cycle_publishes_trending_and_analytics() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(vec![raw(
            "https://example.com/a",
            "Joe Biden signs bill",
            "ceremony at the White House",
        )])]));

        let store = ArticleStore::new_in_memory().unwrap();
        let registry = OfficialRegistry::new_in_memory().unwrap();
        registry.seed(&[("Joe Biden", "Executive")]).unwrap();

        let hub = Arc::new(BroadcastHub::new());
        let (_id, mut rx) = hub.subscribe();

        let cycle = IngestionCycle::new(
            fetcher,
            store,
            registry,
            Arc::clone(&hub),
            IngestionConfig::default(),
        );
        cycle.run_once().await.unwrap();

        let first = rx.recv().await.unwrap();
        let ServerMessage::ArticlesNew { articles } = first else {
            panic!("expected articles:new first");
        };
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://example.com/a");

        let second = rx.recv().await.unwrap();
        let ServerMessage::TrendingUpdate { trending } = second else {
            panic!("expected trending:update second");
        };
        assert_eq!(trending.officials[0].mentions_count, 1);

        let third = rx.recv().await.unwrap();
        let ServerMessage::AnalyticsUpdate { analytics } = third else {
            panic!("expected analytics:update third");
        };
        assert_eq!(analytics.total_articles, 1);
        assert_eq!(analytics.active_departments, 1);
        assert_eq!(analytics.featured_officials, 1);
        assert_eq!(cycle.last_update(), Some(analytics.last_update));
    }

    #[tokio::test]
    async fn empty_batch_publishes_no_articles_event() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(vec![])]));
        let store = ArticleStore::new_in_memory().unwrap();
        let registry = OfficialRegistry::new_in_memory().unwrap();

        let hub = Arc::new(BroadcastHub::new());
        let (_id, mut rx) = hub.subscribe();

        let cycle = IngestionCycle::new(
            fetcher,
            store,
            registry,
            Arc::clone(&hub),
            IngestionConfig::default(),
        );
        cycle.run_once().await.unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerMessage::TrendingUpdate { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerMessage::AnalyticsUpdate { .. }
        ));
    }

    #[test]
    fn normalize_trims_and_defaults() {
        let raw = RawArticle {
            url: Some("  https://example.com/a  ".to_string()),
            title: Some("  Title  ".to_string()),
            content: None,
            department: Some("   ".to_string()),
            officials: vec!["  Joe Biden ".to_string(), "".to_string()],
            date: None,
            source: Some("".to_string()),
        };

        let article = normalize(raw).unwrap();
        assert_eq!(article.url, "https://example.com/a");
        assert_eq!(article.title, "Title");
        assert_eq!(article.content, "");
        assert_eq!(article.department, "General");
        assert_eq!(article.officials, vec!["Joe Biden"]);
        assert_eq!(article.source, None);
    }
}
