//! Handlers for the device-facing ingestion boundary: vitals submission and
//! heartbeats.
//!
//! Both endpoints drive the reachability state machine; only `submit_data`
//! runs the classification pipeline. Nothing is broadcast for state that
//! failed to persist: every insert happens before its corresponding event.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use wardsight_core::device::DeviceStatus;
use wardsight_core::error::CoreError;
use wardsight_core::window::VitalsSample;
use wardsight_db::models::alert::CreateAlert;
use wardsight_db::models::reading::CreateReading;
use wardsight_db::repositories::{AlertRepo, DeviceRepo, ReadingRepo};
use wardsight_events::LiveEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::device::{ensure_claimed_identity, AuthedDevice};
use crate::response::AckResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /api/device/data`, as sent by unit firmware.
#[derive(Debug, Deserialize)]
pub struct DeviceDataRequest {
    pub device_id: String,
    pub heart_rate: f64,
    pub spo2: f64,
    /// Occupancy flag: 0 = empty, 1 = occupied.
    pub bed_status: i16,
}

/// Body of `POST /api/device/heartbeat`.
#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub device_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/device/data
///
/// Ingest one vitals reading: refresh reachability, persist the reading,
/// classify it against the device's sliding window, then broadcast.
pub async fn submit_data(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(input): Json<DeviceDataRequest>,
) -> AppResult<Json<AckResponse>> {
    ensure_claimed_identity(&device, &input.device_id)?;

    if !(0..=1).contains(&input.bed_status) {
        return Err(AppError::Core(CoreError::Validation(
            "bed_status must be 0 or 1".into(),
        )));
    }

    // Reachability first: any authenticated contact counts, and the
    // transition event must be observable before this reading's data.
    let came_online = DeviceRepo::record_contact(&state.pool, &device.device_id).await?;
    if came_online {
        state
            .hub
            .broadcast(LiveEvent::device_status(
                &device.device_id,
                DeviceStatus::Online,
            ))
            .await;
        tracing::info!(device_id = %device.device_id, "Device came online");
    }

    ReadingRepo::insert(
        &state.pool,
        &CreateReading {
            device_id: device.device_id.clone(),
            heart_rate: input.heart_rate,
            spo2: input.spo2,
            bed_status: input.bed_status,
        },
    )
    .await?;

    // Classification sees the window only after the reading is durably
    // stored, so the in-process history never gets ahead of the database.
    let sample = VitalsSample {
        heart_rate: input.heart_rate,
        spo2: input.spo2,
    };
    if let Some(draft) = state.vitals.observe(&device.device_id, sample) {
        AlertRepo::insert(&state.pool, &CreateAlert::from_draft(&device.device_id, &draft))
            .await?;
        tracing::warn!(
            device_id = %device.device_id,
            severity = draft.severity.as_str(),
            message = %draft.message,
            "Alert raised"
        );
        state
            .hub
            .broadcast(LiveEvent::alert(&device.device_id, &draft))
            .await;
    }

    state
        .hub
        .broadcast(LiveEvent::sensor_data(
            &device.device_id,
            input.heart_rate,
            input.spo2,
            input.bed_status,
        ))
        .await;

    Ok(Json(AckResponse::ok()))
}

/// POST /api/device/heartbeat
///
/// Reachability refresh with no vitals payload: flips an offline device
/// online (one status broadcast) or just touches `last_contact`.
pub async fn heartbeat(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(input): Json<HeartbeatRequest>,
) -> AppResult<Json<AckResponse>> {
    ensure_claimed_identity(&device, &input.device_id)?;

    let came_online = DeviceRepo::record_contact(&state.pool, &device.device_id).await?;
    if came_online {
        state
            .hub
            .broadcast(LiveEvent::device_status(
                &device.device_id,
                DeviceStatus::Online,
            ))
            .await;
        tracing::info!(device_id = %device.device_id, "Device came online");
    }

    Ok(Json(AckResponse::ok()))
}
