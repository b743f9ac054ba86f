//! Alert entity model.

use serde::Serialize;
use sqlx::FromRow;
use wardsight_core::types::{DbId, Timestamp};

/// An alert row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub device_id: String,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub escalation_status: String,
    pub timestamp: Timestamp,
}

/// DTO for inserting an alert. Always created with `escalation_status = new`.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub device_id: String,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
}

impl CreateAlert {
    /// Build the insert DTO from a detector or monitor verdict.
    pub fn from_draft(device_id: &str, draft: &wardsight_core::alert::AlertDraft) -> Self {
        Self {
            device_id: device_id.to_string(),
            alert_type: draft.alert_type.as_str().to_string(),
            severity: draft.severity.as_str().to_string(),
            message: draft.message.clone(),
        }
    }
}
