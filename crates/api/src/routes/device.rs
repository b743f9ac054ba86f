//! Route definitions for the `/device` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::{device, ingest};
use crate::state::AppState;

/// Routes mounted at `/api/device`.
///
/// `data` and `heartbeat` authenticate with the device API key; the rest
/// require an operator JWT.
///
/// ```text
/// POST   /register                      -> register_device
/// POST   /data                          -> submit_data
/// POST   /heartbeat                     -> heartbeat
/// POST   /{device_id}/regenerate-key    -> regenerate_key
/// DELETE /{device_id}                   -> delete_device (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(device::register_device))
        .route("/data", post(ingest::submit_data))
        .route("/heartbeat", post(ingest::heartbeat))
        .route("/{device_id}/regenerate-key", post(device::regenerate_key))
        .route("/{device_id}", delete(device::delete_device))
}
