//! Analytics endpoint

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use chrono::Utc;
use tracing::error;

use govwire_services::analytics;

use crate::AppState;

/// Create analytics routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/analytics", get(get_analytics))
}

/// GET /api/analytics - Aggregate view over the stores.
///
/// `last_update` reflects the most recent successful ingestion cycle; before
/// the first one completes it falls back to the current time with zeroed
/// counts, matching an empty store.
async fn get_analytics(State(state): State<AppState>) -> impl IntoResponse {
    let last_update = state.cycle.last_update().unwrap_or_else(Utc::now);

    match analytics::compute(&state.store, &state.registry, last_update) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("Failed to compute analytics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to compute analytics: {}", e)
                })),
            )
                .into_response()
        }
    }
}
