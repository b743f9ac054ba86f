use std::sync::Arc;

use wardsight_core::detector::VitalsEngine;
use wardsight_events::FeedHub;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wardsight_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live-feed broadcast hub (dashboard subscribers).
    pub hub: Arc<FeedHub>,
    /// Sliding windows + anomaly detector.
    pub vitals: Arc<VitalsEngine>,
}
