//! Device API-key authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wardsight_core::device_keys::hash_device_key;
use wardsight_core::error::CoreError;
use wardsight_db::models::device::Device;
use wardsight_db::repositories::DeviceRepo;

use crate::error::AppError;
use crate::state::AppState;

/// A bedside unit authenticated by the `x-api-key` header.
///
/// The presented key is hashed and looked up; a missing or unknown key is
/// rejected with 401 before any handler runs, so failed authentication can
/// never mutate state. Handlers must still check that the body's claimed
/// `device_id` matches [`Device::device_id`] (see
/// [`ensure_claimed_identity`]).
pub struct AuthedDevice(pub Device);

impl FromRequestParts<AppState> for AuthedDevice {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing API key".into())))?;

        let device = DeviceRepo::find_by_key_hash(&state.pool, &hash_device_key(api_key))
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    key_prefix = &api_key[..api_key.len().min(8)],
                    "Invalid device API key attempt"
                );
                AppError::Core(CoreError::Unauthorized("Invalid API key".into()))
            })?;

        Ok(AuthedDevice(device))
    }
}

/// Reject with 403 when a request body claims a different device identity
/// than the one its API key belongs to.
pub fn ensure_claimed_identity(device: &Device, claimed: &str) -> Result<(), AppError> {
    if device.device_id != claimed {
        return Err(AppError::Core(CoreError::Forbidden(
            "API key does not match device_id".into(),
        )));
    }
    Ok(())
}
