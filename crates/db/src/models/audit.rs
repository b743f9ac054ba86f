//! Audit log entity model.

use serde::Serialize;
use sqlx::FromRow;
use wardsight_core::types::{DbId, Timestamp};

/// An activity record from the `audit_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub details: Option<String>,
    pub timestamp: Timestamp,
}
