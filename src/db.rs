use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};

use crate::poll::{VoteCounts, VoteType};

/// One poll vote as stored; `created_at` is an RFC 3339 UTC timestamp.
#[derive(Debug, Clone, FromRow)]
pub struct Vote {
    pub vote_type: String,
    pub created_at: String,
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS poll_votes (
                id INTEGER PRIMARY KEY,
                vote_type TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_poll_votes_created_at
            ON poll_votes(created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a single vote, stamped with the current time.
    pub async fn insert_vote(&self, vote_type: VoteType) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO poll_votes (vote_type, created_at) VALUES (?, ?)")
            .bind(vote_type.as_str())
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All-time totals per choice. A choice nobody picked yet reads zero.
    pub async fn vote_counts(&self) -> anyhow::Result<VoteCounts> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT vote_type, COUNT(*) FROM poll_votes GROUP BY vote_type")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = VoteCounts::default();
        for (vote_type, count) in rows {
            match vote_type.as_str() {
                "in" => counts.in_votes = count,
                "out" => counts.out_votes = count,
                _ => {}
            }
        }
        Ok(counts)
    }

    /// Votes cast on or after `cutoff`, oldest first.
    pub async fn votes_since(&self, cutoff: DateTime<Utc>) -> anyhow::Result<Vec<Vote>> {
        let votes = sqlx::query_as::<_, Vote>(
            r#"
            SELECT vote_type, created_at FROM poll_votes
            WHERE created_at >= ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;
        Ok(votes)
    }
}
