//! Device entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardsight_core::types::{DbId, Timestamp};

/// A bedside unit row from the `devices` table.
///
/// `api_key_hash` never leaves the persistence layer in responses; the
/// serializer skips it so listings only expose the display prefix.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub device_id: String,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub api_key_prefix: String,
    pub bed_number: Option<String>,
    pub ward: Option<String>,
    pub patient_name: Option<String>,
    pub status: String,
    pub last_contact: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for registering a new device.
///
/// Ward and bed number are auto-assigned when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub bed_number: Option<String>,
    pub ward: Option<String>,
    pub patient_name: Option<String>,
}
