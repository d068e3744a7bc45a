//! Article listing endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::filter::filter_articles;
use crate::AppState;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    /// Exact official name the article must credit
    pub official: Option<String>,
    /// Exact department match
    pub department: Option<String>,
    /// Case-insensitive keyword over title or content
    pub q: Option<String>,
}

/// Create article routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/articles", get(list_articles))
}

/// GET /api/articles - All stored articles, most recent first.
///
/// On an empty store this triggers one on-demand ingestion cycle before
/// responding; if a timer-driven cycle is already in flight the trigger is a
/// no-op and whatever is stored is returned.
async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticlesQuery>,
) -> impl IntoResponse {
    match state.store.count() {
        Ok(0) => {
            info!("Store is empty, running on-demand ingestion cycle");
            if let Err(e) = state.cycle.run_once().await {
                error!("On-demand ingestion cycle failed: {}", e);
            }
        }
        Ok(_) => {}
        Err(e) => {
            error!("Failed to check store: {}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": format!("Storage unavailable: {}", e)
                })),
            )
                .into_response();
        }
    }

    match state.store.list_all() {
        Ok(articles) => {
            let filtered = filter_articles(
                articles,
                non_empty(params.official.as_deref()),
                non_empty(params.department.as_deref()),
                non_empty(params.q.as_deref()),
            );
            (StatusCode::OK, Json(filtered)).into_response()
        }
        Err(e) => {
            error!("Failed to list articles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to list articles: {}", e)
                })),
            )
                .into_response()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
