pub mod auth;
pub mod dashboard;
pub mod device;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                              login (public)
/// /auth/register                           create nurse account (admin)
///
/// /device/register                         register device (operator)
/// /device/data                             vitals ingestion (device key)
/// /device/heartbeat                        reachability refresh (device key)
/// /device/{device_id}/regenerate-key       rotate device key (operator)
/// /device/{device_id}                      delete device (admin)
///
/// /dashboard/devices                       device list
/// /dashboard/device/{device_id}            device detail + recent history
/// /dashboard/stats                         ward overview numbers
/// /dashboard/alerts                        alert list (?severity, limit)
/// /dashboard/alerts/{id}/acknowledge       acknowledge alert (PUT)
/// /dashboard/export/{device_id}            vitals CSV export
///
/// /health                                  service + database health
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/device", device::router())
        .nest("/dashboard", dashboard::router())
        .merge(health::router())
}

/// Build the `/ws` route tree (the live dashboard feed).
pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/live", get(ws::live_feed_handler))
}
