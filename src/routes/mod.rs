// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::aggregator::Aggregator;
use crate::config::AppConfig;
use crate::models::Snapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_tx: broadcast::Sender<Snapshot>,
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) feed_connections: Arc<AtomicUsize>,
}

pub fn app(
    snapshot_tx: broadcast::Sender<Snapshot>,
    aggregator: Arc<Aggregator>,
    feed_connections: Arc<AtomicUsize>,
    config: &AppConfig,
) -> Router {
    let state = AppState {
        snapshot_tx,
        aggregator,
        feed_connections,
    };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/ws/feed", get(ws::ws_feed)) // WS /ws/feed
        .fallback_service(ServeDir::new(&config.server.static_dir)) // viewer assets
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
