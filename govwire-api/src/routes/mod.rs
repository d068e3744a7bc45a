//! API route definitions

mod analytics;
mod articles;
mod health;
mod trending;
pub mod ws;

use crate::AppState;
use axum::Router;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(articles::routes())
        .merge(trending::routes())
        .merge(analytics::routes())
        .merge(health::routes())
}

/// Create WebSocket routes (separate from API)
pub fn ws_routes() -> Router<AppState> {
    ws::routes()
}
