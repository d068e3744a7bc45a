//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    total_articles: u64,
    subscribers: usize,
    /// Most recent successful ingestion cycle; staleness here is the signal
    /// of repeated fetch failures
    last_update: Option<DateTime<Utc>>,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, total_articles) = match state.store.count() {
        Ok(count) => ("healthy", count),
        Err(_) => ("degraded", 0),
    };

    let response = HealthResponse {
        status: status.to_string(),
        total_articles,
        subscribers: state.hub.subscriber_count(),
        last_update: state.cycle.last_update(),
    };

    let code = if status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
