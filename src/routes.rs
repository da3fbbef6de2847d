use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::FeedConfig;
use crate::db::Database;
use crate::fetcher::Fetcher;
use crate::news;
use crate::poll::{self, VoteType};

/// Intermediary caches may serve the news response this many seconds.
const NEWS_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate";

pub struct AppState {
    pub db: Arc<Database>,
    pub fetcher: Arc<Fetcher>,
    pub feeds: Arc<Vec<FeedConfig>>,
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": "internal server error",
            "message": self.0.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // The news endpoint is the public read-only surface; poll routes also
    // accept JSON posts from the dashboard.
    let news_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);
    let poll_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let news_routes = Router::new()
        .route("/api/news", get(news_handler))
        .layer(news_cors);
    let poll_routes = Router::new()
        .route("/api/poll/results", get(poll_results))
        .route("/api/poll/trend", get(poll_trend))
        .route("/api/poll/vote", post(submit_vote))
        .layer(poll_cors);

    Router::new()
        .merge(news_routes)
        .merge(poll_routes)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Route handlers

/// Aggregated news: fetch all feeds, merge, sort, cap, present.
///
/// Feed failures are absorbed inside the fetcher; an empty result is still a
/// success. Only unexpected internal errors produce the failure envelope.
pub async fn news_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.fetcher.fetch_all(&state.feeds).await;
    let top = news::aggregate(items);
    let body = news::present(&top, Utc::now());

    Ok(([(header::CACHE_CONTROL, NEWS_CACHE_CONTROL)], Json(body)))
}

pub async fn poll_results(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state.db.vote_counts().await?;
    Ok(Json(counts))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    #[default]
    Week,
    Month,
}

impl TrendPeriod {
    pub fn days(self) -> i64 {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default)]
    pub period: TrendPeriod,
}

pub async fn poll_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = query.period.days();
    let now = Utc::now();
    let votes = state.db.votes_since(now - Duration::days(days)).await?;

    Ok(Json(poll::bucket_daily(&votes, days, now)))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: VoteType,
}

pub async fn submit_vote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.db.insert_vote(request.vote_type).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

pub async fn health() -> impl IntoResponse {
    "OK"
}
