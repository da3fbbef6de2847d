use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serialize;

use crate::fetcher::NewsItem;

/// The dashboard shows the ten most recent items.
pub const MAX_ITEMS: usize = 10;

/// A news item in the shape the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct PresentedItem {
    pub source: String,
    pub headline: String,
    pub time: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub success: bool,
    pub count: usize,
    pub items: Vec<PresentedItem>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// Merge items from all feeds: newest first, capped at [`MAX_ITEMS`].
///
/// Items without a publish date sort after all dated items. Duplicates
/// across feeds are kept; the deployment decides how many feeds it runs.
pub fn aggregate(mut items: Vec<NewsItem>) -> Vec<NewsItem> {
    items.sort_by(|a, b| b.published.cmp(&a.published));
    items.truncate(MAX_ITEMS);
    items
}

/// Dutch relative-time label for a publish date, evaluated against `now`.
///
/// Under an hour reads in minutes, under a day in hours, exactly one
/// day-bucket back reads "Gisteren", under a week in days, and anything
/// older gets the absolute date.
pub fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(published);
    let hours = age.num_hours();
    let days = hours / 24;

    if hours < 1 {
        format!("{} minuten geleden", age.num_minutes())
    } else if hours < 24 {
        format!("{} uur geleden", hours)
    } else if days == 1 {
        "Gisteren".to_string()
    } else if days < 7 {
        format!("{} dagen geleden", days)
    } else {
        format!(
            "{}-{}-{}",
            published.day(),
            published.month(),
            published.year()
        )
    }
}

/// Build the response envelope for the aggregated items.
///
/// The relative-time labels depend on `now`, so this is recomputed for every
/// response and never cached.
pub fn present(items: &[NewsItem], now: DateTime<Utc>) -> NewsResponse {
    let presented: Vec<PresentedItem> = items
        .iter()
        .map(|item| PresentedItem {
            source: item.source.clone(),
            headline: item.headline.clone(),
            time: item
                .published
                .map(|published| time_ago(published, now))
                .unwrap_or_else(|| "Onbekend".to_string()),
            url: item.link.clone(),
        })
        .collect();

    NewsResponse {
        success: true,
        count: presented.len(),
        items: presented,
        last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
