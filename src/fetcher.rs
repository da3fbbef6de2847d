use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use regex::Regex;
use reqwest::Client;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::FeedConfig;

/// Google News items carry the attributed source in the title as
/// "Source - Headline"; the split is on the first hyphen only.
static SOURCE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^-]+)-(.+)$").expect("source/title pattern is valid"));

/// A feed entry reduced to what the dashboard needs.
#[derive(Debug, Clone)]
pub struct NewsItem {
    pub source: String,
    pub headline: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("feed parse error: {0}")]
    Parse(#[from] parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("RvpPoll/1.0 (Public Opinion Tracker)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch every configured feed concurrently and merge the results.
    ///
    /// One task per feed; all tasks are joined before returning. A feed that
    /// fails (timeout, network error, bad status, unparseable document)
    /// contributes no items and never fails the aggregation as a whole.
    pub async fn fetch_all(&self, feeds: &[FeedConfig]) -> Vec<NewsItem> {
        info!("Fetching {} feeds", feeds.len());

        let mut tasks = JoinSet::new();
        for feed in feeds.iter().cloned() {
            let client = self.client.clone();
            tasks.spawn(async move {
                match Self::fetch_feed(&client, &feed).await {
                    Ok(items) => items,
                    Err(e) => {
                        error!("Failed to fetch feed '{}': {}", feed.name, e);
                        Vec::new()
                    }
                }
            });
        }

        let mut all_items = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(items) => all_items.extend(items),
                Err(e) => error!("Feed fetch task failed: {}", e),
            }
        }

        all_items
    }

    async fn fetch_feed(client: &Client, feed: &FeedConfig) -> Result<Vec<NewsItem>, FetchError> {
        debug!("Fetching feed: {} ({})", feed.name, feed.url);

        let response = client.get(&feed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        let parsed = parser::parse(&bytes[..])?;

        Ok(parsed
            .entries
            .iter()
            .map(|entry| Self::normalize_entry(entry, &feed.name))
            .collect())
    }

    /// Reduce a raw feed entry to a [`NewsItem`].
    ///
    /// Missing optional fields fall back rather than dropping the entry: a
    /// missing publish date falls back to the updated date, a title that does
    /// not carry an attributed source falls back to the feed's display name.
    pub fn normalize_entry(entry: &Entry, feed_name: &str) -> NewsItem {
        let raw_title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();

        let (source, headline) = Self::split_source_title(&raw_title, feed_name);

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let published = entry.published.or(entry.updated);

        NewsItem {
            source,
            headline,
            link,
            published,
        }
    }

    /// Split "Source - Headline" on the first hyphen, trimming both halves.
    ///
    /// Titles with no hyphen, with a leading hyphen, or with nothing after
    /// the hyphen do not match; those keep the raw title as headline and use
    /// the feed name as source. A headline that itself contains hyphens is
    /// split on the first one regardless (inherited behavior).
    pub fn split_source_title(title: &str, feed_name: &str) -> (String, String) {
        match SOURCE_TITLE.captures(title) {
            Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
            None => (feed_name.to_string(), title.to_string()),
        }
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
