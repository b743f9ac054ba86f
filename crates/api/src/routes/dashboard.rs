//! Route definitions for the `/dashboard` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{alerts, dashboard};
use crate::state::AppState;

/// Routes mounted at `/api/dashboard`. All require an operator JWT.
///
/// ```text
/// GET /devices                        -> list_devices
/// GET /device/{device_id}             -> device_detail
/// GET /stats                          -> stats
/// GET /alerts                         -> list_alerts
/// PUT /alerts/{id}/acknowledge        -> acknowledge_alert
/// GET /export/{device_id}             -> export_vitals_csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/devices", get(dashboard::list_devices))
        .route("/device/{device_id}", get(dashboard::device_detail))
        .route("/stats", get(dashboard::stats))
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/{id}/acknowledge", put(alerts::acknowledge_alert))
        .route("/export/{device_id}", get(dashboard::export_vitals_csv))
}
