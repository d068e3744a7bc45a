//! GovWire API Server
//!
//! HTTP + websocket server for the government news aggregator: serves stored
//! articles, trending officials, and analytics, and streams pipeline deltas
//! to connected clients.

mod filter;
mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use govwire_feeds::RssFetcher;
use govwire_services::{
    ArticleStore, BroadcastHub, IngestionConfig, IngestionCycle, OfficialRegistry,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Officials tracked out of the box. The registry seed is idempotent, so
/// restarts keep existing counters.
const SEED_OFFICIALS: &[(&str, &str)] = &[
    ("Joe Biden", "Executive"),
    ("Janet Yellen", "Treasury"),
    ("Antony Blinken", "State"),
    ("Pete Buttigieg", "Transportation"),
    ("John Fetterman", "Senate"),
];

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ArticleStore,
    pub registry: OfficialRegistry,
    pub hub: Arc<BroadcastHub>,
    pub cycle: Arc<IngestionCycle>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,govwire_api=debug")),
        )
        .init();

    info!("Starting GovWire API");

    // Initialize storage
    let db_path =
        std::env::var("GOVWIRE_DB_PATH").unwrap_or_else(|_| "data/govwire.db".to_string());
    info!("Initializing storage at: {}", db_path);
    let store = ArticleStore::new(&db_path)?;
    let registry = OfficialRegistry::new(&db_path)?;
    registry.seed(SEED_OFFICIALS)?;

    // Initialize broadcast hub and ingestion cycle
    let hub = Arc::new(BroadcastHub::new());
    let fetcher = Arc::new(RssFetcher::new());

    let mut ingestion_config = IngestionConfig::default();
    if let Some(secs) = std::env::var("INGEST_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        ingestion_config.poll_interval_secs = secs;
    }

    let cycle = Arc::new(IngestionCycle::new(
        fetcher,
        store.clone(),
        registry.clone(),
        Arc::clone(&hub),
        ingestion_config,
    ));

    // Start the timer-driven ingestion loop (first tick fires immediately)
    let cycle_driver = Arc::clone(&cycle);
    tokio::spawn(async move {
        cycle_driver.start().await;
    });

    // Create app state
    let state = AppState {
        store,
        registry,
        hub,
        cycle,
    };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::ws_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
