mod config;
mod db;
mod fetcher;
mod news;
mod poll;
mod routes;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::fetcher::Fetcher;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rvp_poll=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("feeds.toml")?;
    info!("Loaded {} feeds from configuration", config.feeds.len());

    // Initialize database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:rvp_poll.db?mode=rwc".to_string());
    let db = Database::new(&database_url).await?;
    db.initialize().await?;
    info!("Database initialized");

    // Create app state
    let state = Arc::new(AppState {
        db: Arc::new(db),
        fetcher: Arc::new(Fetcher::new()),
        feeds: Arc::new(config.feeds),
    });

    // Build router
    let app = routes::router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server starting on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
