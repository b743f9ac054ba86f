//! Handlers for alert listing and acknowledgment.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use wardsight_core::alert::Severity;
use wardsight_core::types::DbId;
use wardsight_db::models::alert::Alert;
use wardsight_db::repositories::AlertRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Hard cap on alerts returned by the listing endpoint.
const MAX_ALERT_LIMIT: i64 = 200;
/// Default alert listing length.
const DEFAULT_ALERT_LIMIT: i64 = 50;

/// Query parameters for the alert listing endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub severity: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/dashboard/alerts
///
/// Most recent alerts, optionally filtered by severity.
pub async fn list_alerts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let limit = query.limit.unwrap_or(DEFAULT_ALERT_LIMIT);
    if !(1..=MAX_ALERT_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_ALERT_LIMIT}"
        )));
    }

    if let Some(severity) = &query.severity {
        if Severity::parse(severity).is_none() {
            return Err(AppError::BadRequest(format!(
                "Unknown severity: {severity}"
            )));
        }
    }

    let alerts = AlertRepo::list(&state.pool, query.severity.as_deref(), limit).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// PUT /api/dashboard/alerts/{id}/acknowledge
///
/// Fire the one-way `new -> acknowledged` transition. Acknowledging an
/// already-acknowledged alert succeeds without change; only an unknown id
/// is an error.
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    user: AuthUser,
    Path(alert_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let alert = AlertRepo::acknowledge(&state.pool, alert_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Alert {alert_id} not found")))?;

    tracing::info!(alert_id, acknowledged_by = %user.username, "Alert acknowledged");
    Ok(Json(DataResponse { data: alert }))
}
