//! RSS feed client for government news
//!
//! Fetches and parses RSS feeds from curated sources covering the federal
//! government, mapping each entry to a `RawArticle` candidate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use govwire_core::{ArticleFetcher, FetchError, RawArticle};

use crate::error::FeedError;

/// Candidates older than this are dropped at the feed boundary
const MAX_ARTICLE_AGE_DAYS: i64 = 7;

/// RSS feed definition
#[derive(Debug, Clone)]
pub struct RssFeed {
    /// Name of the source
    pub name: String,
    /// RSS feed URL
    pub url: String,
    /// Department label applied to this feed's candidates
    pub department: String,
}

impl RssFeed {
    pub fn new(name: &str, url: &str, department: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            department: department.to_string(),
        }
    }
}

/// Curated list of RSS feeds covering US government news
pub fn get_curated_feeds() -> Vec<RssFeed> {
    vec![
        // Wire Services - most reliable for breaking news
        RssFeed::new("AP News", "https://feedx.net/rss/ap.xml", "General"),
        // Political News
        RssFeed::new(
            "Politico",
            "https://www.politico.com/rss/politicopicks.xml",
            "Executive",
        ),
        RssFeed::new("The Hill", "https://thehill.com/feed/", "Senate"),
        RssFeed::new(
            "NPR Politics",
            "https://feeds.npr.org/1014/rss.xml",
            "Executive",
        ),
        // Economic / financial policy
        RssFeed::new(
            "Federal Reserve",
            "https://www.federalreserve.gov/feeds/press_all.xml",
            "Treasury",
        ),
        // Foreign policy
        RssFeed::new(
            "Guardian US",
            "https://www.theguardian.com/us-news/rss",
            "State",
        ),
        RssFeed::new(
            "BBC News",
            "https://feeds.bbci.co.uk/news/rss.xml",
            "General",
        ),
    ]
}

/// RSS-backed implementation of the fetch collaborator
pub struct RssFetcher {
    client: Client,
    feeds: Vec<RssFeed>,
}

impl RssFetcher {
    /// Create a new fetcher with the curated feed list
    pub fn new() -> Self {
        Self::with_feeds(get_curated_feeds())
    }

    /// Create with custom feeds
    pub fn with_feeds(feeds: Vec<RssFeed>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            feeds,
        }
    }

    /// Fetch a single RSS feed
    async fn fetch_feed(&self, feed: &RssFeed) -> Result<Vec<RawArticle>, FeedError> {
        let response = self
            .client
            .get(&feed.url)
            .header("User-Agent", "GovWire/1.0")
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::BadStatus {
                status: response.status().as_u16(),
                url: feed.url.clone(),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let channel = rss::Channel::read_from(&content[..])
            .map_err(|e| FeedError::ParseError(format!("{}: {}", feed.url, e)))?;

        Ok(parse_channel(&channel, feed))
    }
}

impl Default for RssFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleFetcher for RssFetcher {
    /// Fetch candidates from all feeds.
    ///
    /// A single failing feed is logged and skipped; only a total failure
    /// (every feed errored) is reported as `FetchError`, which makes the
    /// ingestion cycle skip the tick.
    async fn fetch_raw(&self) -> Result<Vec<RawArticle>, FetchError> {
        let mut candidates = Vec::new();
        let mut failures = 0usize;
        let mut last_error = None;

        for feed in &self.feeds {
            match self.fetch_feed(feed).await {
                Ok(items) => {
                    debug!("Fetched {} candidates from {}", items.len(), feed.name);
                    candidates.extend(items);
                }
                Err(e) => {
                    warn!("Failed to fetch feed {}: {}", feed.name, e);
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if !self.feeds.is_empty() && failures == self.feeds.len() {
            let detail = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no feeds configured".to_string());
            return Err(FetchError::Network(format!(
                "all {} feeds failed, last error: {}",
                failures, detail
            )));
        }

        // Newest first so the freshest candidates survive any downstream cap
        candidates.sort_by(|a, b| b.date.cmp(&a.date));

        info!("Fetched {} total candidates from RSS feeds", candidates.len());
        Ok(candidates)
    }
}

/// Parse an RSS channel into raw candidates
fn parse_channel(channel: &rss::Channel, feed: &RssFeed) -> Vec<RawArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let published_at = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc));

            // Skip stale entries some feeds keep around for weeks
            if let Some(date) = published_at {
                if (Utc::now() - date).num_days() > MAX_ARTICLE_AGE_DAYS {
                    return None;
                }
            }

            Some(RawArticle {
                url: item.link().map(str::to_string),
                title: item.title().map(str::to_string),
                content: item.description().map(strip_html),
                department: Some(feed.department.clone()),
                officials: Vec::new(),
                date: published_at,
                source: Some(feed.name.clone()),
            })
        })
        .collect()
}

/// Strip HTML tags feeds embed in their description fields
fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Wire</title>
    <link>https://example.com</link>
    <description>Test</description>
    <item>
      <title>Treasury unveils new sanctions package</title>
      <link>https://example.com/sanctions</link>
      <description>&lt;p&gt;Janet Yellen announced...&lt;/p&gt;</description>
    </item>
    <item>
      <title>Untitled item with no link</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_channel_into_candidates() {
        let channel = rss::Channel::read_from(SAMPLE_FEED.as_bytes()).unwrap();
        let feed = RssFeed::new("Test Wire", "https://example.com/rss", "Treasury");

        let candidates = parse_channel(&channel, &feed);
        assert_eq!(candidates.len(), 2);

        let first = &candidates[0];
        assert_eq!(first.url.as_deref(), Some("https://example.com/sanctions"));
        assert_eq!(
            first.title.as_deref(),
            Some("Treasury unveils new sanctions package")
        );
        assert_eq!(first.content.as_deref(), Some("Janet Yellen announced..."));
        assert_eq!(first.department.as_deref(), Some("Treasury"));
        assert_eq!(first.source.as_deref(), Some("Test Wire"));

        // Second item has no link; normalization downstream decides its fate
        assert!(candidates[1].url.is_none());
    }

    #[test]
    fn strips_html_from_descriptions() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b></p>"),
            "Hello world".to_string()
        );
        assert_eq!(strip_html("plain text"), "plain text");
    }
}
