//! Handlers for the read-only dashboard endpoints: device listings, stats,
//! and CSV export. Thin data access over the repositories.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use wardsight_db::models::alert::Alert;
use wardsight_db::models::device::Device;
use wardsight_db::models::reading::Reading;
use wardsight_db::repositories::{AlertRepo, DeviceRepo, ReadingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Hard cap on vitals history returned by the device detail endpoint.
const MAX_VITALS_LIMIT: i64 = 500;
/// Default vitals history length.
const DEFAULT_VITALS_LIMIT: i64 = 100;
/// Alerts shown on the device detail view.
const DETAIL_ALERT_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the device detail endpoint.
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub limit: Option<i64>,
}

/// Device detail response: the device plus recent history.
#[derive(Debug, Serialize)]
pub struct DeviceDetail {
    pub device: Device,
    pub vitals: Vec<Reading>,
    pub alerts: Vec<Alert>,
}

/// Ward-level overview numbers.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_devices: i64,
    pub online_devices: i64,
    pub offline_devices: i64,
    pub occupied_beds: i64,
    pub occupancy_percent: f64,
    pub active_alerts: i64,
    pub critical_alerts: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/dashboard/devices
pub async fn list_devices(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Device>>>> {
    let devices = DeviceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/dashboard/device/{device_id}
///
/// Device info plus its recent vitals (oldest first, `limit` capped at 500)
/// and the last 20 alerts (newest first).
pub async fn device_detail(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(device_id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<DeviceDetail>> {
    let limit = query.limit.unwrap_or(DEFAULT_VITALS_LIMIT);
    if !(1..=MAX_VITALS_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_VITALS_LIMIT}"
        )));
    }

    let device = DeviceRepo::find_by_device_id(&state.pool, &device_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device {device_id} not found")))?;

    let vitals = ReadingRepo::recent_for_device(&state.pool, &device_id, limit).await?;
    let alerts = AlertRepo::recent_for_device(&state.pool, &device_id, DETAIL_ALERT_LIMIT).await?;

    Ok(Json(DeviceDetail {
        device,
        vitals,
        alerts,
    }))
}

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<StatsResponse>> {
    let devices = DeviceRepo::counts(&state.pool).await?;
    let occupied_beds = ReadingRepo::occupied_bed_count(&state.pool).await?;
    let alerts = AlertRepo::counts(&state.pool).await?;

    let occupancy_percent = if devices.total_devices > 0 {
        let percent = occupied_beds as f64 / devices.total_devices as f64 * 100.0;
        (percent * 10.0).round() / 10.0
    } else {
        0.0
    };

    Ok(Json(StatsResponse {
        total_devices: devices.total_devices,
        online_devices: devices.online_devices,
        offline_devices: devices.total_devices - devices.online_devices,
        occupied_beds,
        occupancy_percent,
        active_alerts: alerts.active_alerts,
        critical_alerts: alerts.critical_alerts,
    }))
}

/// GET /api/dashboard/export/{device_id}
///
/// Full vitals history for one device as a CSV attachment.
pub async fn export_vitals_csv(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(device_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let readings = ReadingRepo::all_for_device(&state.pool, &device_id).await?;

    let mut csv = String::from("timestamp,heart_rate,spo2,bed_status\n");
    for r in &readings {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            r.timestamp.to_rfc3339(),
            r.heart_rate,
            r.spo2,
            r.bed_status
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={device_id}_vitals.csv"),
            ),
        ],
        csv,
    ))
}
