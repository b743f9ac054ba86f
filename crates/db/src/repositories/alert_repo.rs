//! Repository for the `alerts` table.

use sqlx::PgPool;
use wardsight_core::alert::EscalationStatus;
use wardsight_core::types::DbId;

use crate::models::alert::{Alert, CreateAlert};

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, device_id, alert_type, severity, message, escalation_status, timestamp";

/// Aggregate alert counts for the dashboard.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct AlertCounts {
    pub active_alerts: i64,
    pub critical_alerts: i64,
}

/// Insert, query, and acknowledgment operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert in the `new` escalation state.
    pub async fn insert(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (device_id, alert_type, severity, message, escalation_status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(&input.device_id)
            .bind(&input.alert_type)
            .bind(&input.severity)
            .bind(&input.message)
            .bind(EscalationStatus::New.as_str())
            .fetch_one(pool)
            .await
    }

    /// List alerts, most recent first, optionally filtered by severity.
    pub async fn list(
        pool: &PgPool,
        severity: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        match severity {
            Some(severity) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM alerts WHERE severity = $1 \
                     ORDER BY timestamp DESC LIMIT $2"
                );
                sqlx::query_as::<_, Alert>(&query)
                    .bind(severity)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM alerts ORDER BY timestamp DESC LIMIT $1");
                sqlx::query_as::<_, Alert>(&query)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// The most recent `limit` alerts for one device.
    pub async fn recent_for_device(
        pool: &PgPool,
        device_id: &str,
        limit: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE device_id = $1 \
             ORDER BY timestamp DESC LIMIT $2"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(device_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Acknowledge an alert by id.
    ///
    /// The write sets the terminal state unconditionally, so acknowledging
    /// an already-acknowledged alert succeeds and changes nothing, even
    /// under concurrent calls. Returns `None` only when no alert with that
    /// id exists.
    pub async fn acknowledge(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET escalation_status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(EscalationStatus::Acknowledged.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Unacknowledged and unacknowledged-critical alert counts.
    pub async fn counts(pool: &PgPool) -> Result<AlertCounts, sqlx::Error> {
        sqlx::query_as::<_, AlertCounts>(
            "SELECT COUNT(*) FILTER (WHERE escalation_status = 'new') AS active_alerts, \
                    COUNT(*) FILTER (WHERE escalation_status = 'new' AND severity = 'critical') \
                        AS critical_alerts \
             FROM alerts",
        )
        .fetch_one(pool)
        .await
    }
}
