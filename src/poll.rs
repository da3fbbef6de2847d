use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Vote;

/// The two poll choices: keep the coach in, or vote him out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    In,
    Out,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::In => "in",
            VoteType::Out => "out",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteCounts {
    #[serde(rename = "in")]
    pub in_votes: i64,
    #[serde(rename = "out")]
    pub out_votes: i64,
}

impl VoteCounts {
    pub fn total(&self) -> i64 {
        self.in_votes + self.out_votes
    }
}

/// One calendar day in the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(rename = "in")]
    pub in_votes: i64,
    #[serde(rename = "out")]
    pub out_votes: i64,
    pub total: i64,
}

const DUTCH_MONTHS: [&str; 12] = [
    "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Dutch short day label, e.g. "5 aug".
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), DUTCH_MONTHS[date.month0() as usize])
}

/// Group votes into daily totals over the last `days` days.
///
/// Returns exactly `days` points, oldest first; days without votes read
/// zero. Rows with an unparseable timestamp or an unknown vote type are
/// skipped rather than failing the chart.
pub fn bucket_daily(votes: &[Vote], days: i64, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let mut by_day: HashMap<String, (i64, i64)> = HashMap::new();
    for vote in votes {
        let Ok(created) = DateTime::parse_from_rfc3339(&vote.created_at) else {
            continue;
        };
        let label = day_label(created.with_timezone(&Utc).date_naive());
        let entry = by_day.entry(label).or_insert((0, 0));
        match vote.vote_type.as_str() {
            "in" => entry.0 += 1,
            "out" => entry.1 += 1,
            _ => {}
        }
    }

    (0..days)
        .rev()
        .map(|offset| {
            let date = (now - Duration::days(offset)).date_naive();
            let label = day_label(date);
            let (in_votes, out_votes) = by_day.get(&label).copied().unwrap_or((0, 0));
            TrendPoint {
                date: label,
                in_votes,
                out_votes,
                total: in_votes + out_votes,
            }
        })
        .collect()
}
