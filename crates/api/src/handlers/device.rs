//! Handlers for device provisioning: registration, key regeneration,
//! deletion. All three are operator actions and audit-logged.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use wardsight_core::device_keys::generate_device_key;
use wardsight_core::error::CoreError;
use wardsight_core::placement;
use wardsight_db::models::device::CreateDevice;
use wardsight_db::repositories::{AuditRepo, DeviceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for device registration. Carries the plaintext API key, the
/// only time it is ever visible.
#[derive(Debug, Serialize)]
pub struct DeviceRegisteredResponse {
    pub device_id: String,
    pub api_key: String,
    pub bed_number: String,
    pub ward: String,
    pub message: String,
}

/// Response for key regeneration.
#[derive(Debug, Serialize)]
pub struct KeyRegeneratedResponse {
    pub device_id: String,
    pub new_api_key: String,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/device/register
///
/// Create a device. Ward and bed number are auto-assigned when omitted:
/// first ward block with free capacity, first free zero-padded bed in it.
pub async fn register_device(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<DeviceRegisteredResponse>)> {
    let placements = DeviceRepo::list_placements(&state.pool).await?;

    let ward = match input.ward {
        Some(ward) if !ward.is_empty() => ward,
        _ => placement::assign_ward(&placements),
    };
    let bed_number = match input.bed_number {
        Some(bed) if !bed.is_empty() => bed,
        _ => placement::assign_bed(&placements, &ward).ok_or_else(|| {
            AppError::BadRequest(format!(
                "{ward} is full (max {} beds)",
                placement::BEDS_PER_WARD
            ))
        })?,
    };

    let device_id = placement::device_id_for(&ward, &bed_number);
    if DeviceRepo::find_by_device_id(&state.pool, &device_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Device {device_id} already exists"
        ))));
    }

    let key = generate_device_key();
    let device = DeviceRepo::create(
        &state.pool,
        &device_id,
        &key.hash,
        &key.prefix,
        Some(&bed_number),
        Some(&ward),
        input.patient_name.as_deref(),
    )
    .await?;

    AuditRepo::insert(
        &state.pool,
        user.user_id,
        "device_registered",
        &format!("Device {device_id} registered in {ward}"),
    )
    .await?;

    tracing::info!(device_id = %device.device_id, ward = %ward, bed = %bed_number, "Device registered");
    Ok((
        StatusCode::CREATED,
        Json(DeviceRegisteredResponse {
            device_id: device.device_id,
            api_key: key.plaintext,
            bed_number: bed_number.clone(),
            ward: ward.clone(),
            message: format!(
                "Device registered in {ward}, bed {bed_number}. Flash this API key to the unit."
            ),
        }),
    ))
}

/// POST /api/device/{device_id}/regenerate-key
///
/// Replace a device's API key; the old key stops working immediately.
pub async fn regenerate_key(
    State(state): State<AppState>,
    user: AuthUser,
    Path(device_id): Path<String>,
) -> AppResult<Json<KeyRegeneratedResponse>> {
    let key = generate_device_key();
    let updated = DeviceRepo::set_api_key(&state.pool, &device_id, &key.hash, &key.prefix).await?;
    if !updated {
        return Err(AppError::NotFound(format!("Device {device_id} not found")));
    }

    AuditRepo::insert(
        &state.pool,
        user.user_id,
        "api_key_regenerated",
        &format!("Key regenerated for {device_id}"),
    )
    .await?;

    tracing::info!(device_id = %device_id, "API key regenerated");
    Ok(Json(KeyRegeneratedResponse {
        device_id,
        new_api_key: key.plaintext,
    }))
}

/// DELETE /api/device/{device_id} (admin only)
pub async fn delete_device(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(device_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = DeviceRepo::delete(&state.pool, &device_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Device {device_id} not found")));
    }

    AuditRepo::insert(
        &state.pool,
        admin.user_id,
        "device_deleted",
        &format!("Device {device_id} deleted"),
    )
    .await?;

    Ok(Json(MessageResponse {
        message: format!("Device {device_id} deleted"),
    }))
}
