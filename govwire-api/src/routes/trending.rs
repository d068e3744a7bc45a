//! Trending officials endpoint

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use tracing::error;

use govwire_services::{rank, DEFAULT_TRENDING_SIZE};

use crate::AppState;

/// Create trending routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/trending", get(get_trending))
}

/// GET /api/trending - Top officials ranked by mention count
async fn get_trending(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.snapshot_all() {
        Ok(officials) => {
            let snapshot = rank(&officials, DEFAULT_TRENDING_SIZE);
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        Err(e) => {
            error!("Failed to snapshot officials: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to load trending officials: {}", e)
                })),
            )
                .into_response()
        }
    }
}
