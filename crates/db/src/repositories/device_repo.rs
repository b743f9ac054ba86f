//! Repository for the `devices` table.
//!
//! The status transitions here are guarded conditional UPDATEs so they stay
//! correct under concurrent contacts and reconciliation scans: a transition
//! only fires when the row is still in the state the caller saw.

use sqlx::PgPool;
use wardsight_core::device::DeviceStatus;
use wardsight_core::types::Timestamp;

use crate::models::device::Device;

/// Column list for `devices` queries.
const COLUMNS: &str = "\
    id, device_id, api_key_hash, api_key_prefix, bed_number, ward, \
    patient_name, status, last_contact, created_at";

/// Aggregate device counts for the dashboard.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct DeviceCounts {
    pub total_devices: i64,
    pub online_devices: i64,
}

/// CRUD and state-transition operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    // ── Registration ─────────────────────────────────────────────────────

    /// Insert a new device in the `offline` state.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        device_id: &str,
        api_key_hash: &str,
        api_key_prefix: &str,
        bed_number: Option<&str>,
        ward: Option<&str>,
        patient_name: Option<&str>,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices \
                (device_id, api_key_hash, api_key_prefix, bed_number, ward, patient_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(device_id)
            .bind(api_key_hash)
            .bind(api_key_prefix)
            .bind(bed_number)
            .bind(ward)
            .bind(patient_name)
            .bind(DeviceStatus::Offline.as_str())
            .fetch_one(pool)
            .await
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Find a device by its external identity.
    pub async fn find_by_device_id(
        pool: &PgPool,
        device_id: &str,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE device_id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a device by the SHA-256 hash of its API key.
    pub async fn find_by_key_hash(
        pool: &PgPool,
        api_key_hash: &str,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE api_key_hash = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(api_key_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all devices ordered by ward then bed number.
    pub async fn list(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices ORDER BY ward, bed_number");
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }

    /// The (ward, bed_number) placement of every device, for auto-assignment.
    pub async fn list_placements(pool: &PgPool) -> Result<Vec<(String, String)>, sqlx::Error> {
        let rows: Vec<(Option<String>, Option<String>)> =
            sqlx::query_as("SELECT ward, bed_number FROM devices")
                .fetch_all(pool)
                .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(ward, bed)| Some((ward?, bed?)))
            .collect())
    }

    /// Devices that are marked online but have not been heard from since
    /// `cutoff`. This is the lifecycle monitor's scan query.
    pub async fn find_stale(pool: &PgPool, cutoff: Timestamp) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM devices WHERE status = $1 AND last_contact < $2"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(DeviceStatus::Online.as_str())
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Total and online device counts.
    pub async fn counts(pool: &PgPool) -> Result<DeviceCounts, sqlx::Error> {
        sqlx::query_as::<_, DeviceCounts>(
            "SELECT COUNT(*) AS total_devices, \
                    COUNT(*) FILTER (WHERE status = 'online') AS online_devices \
             FROM devices",
        )
        .fetch_one(pool)
        .await
    }

    // ── State transitions ────────────────────────────────────────────────

    /// Record a successful authenticated contact.
    ///
    /// Returns `true` when this contact flipped the device from offline to
    /// online. The guard on `status` means exactly one of any set of
    /// concurrent contacts observes the transition; the rest just refresh
    /// `last_contact`.
    pub async fn record_contact(pool: &PgPool, device_id: &str) -> Result<bool, sqlx::Error> {
        let transitioned = sqlx::query(
            "UPDATE devices SET status = $2, last_contact = NOW() \
             WHERE device_id = $1 AND status = $3",
        )
        .bind(device_id)
        .bind(DeviceStatus::Online.as_str())
        .bind(DeviceStatus::Offline.as_str())
        .execute(pool)
        .await?
        .rows_affected()
            == 1;

        if !transitioned {
            Self::touch(pool, device_id).await?;
        }
        Ok(transitioned)
    }

    /// Refresh `last_contact` without touching the status.
    pub async fn touch(pool: &PgPool, device_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE devices SET last_contact = NOW() WHERE device_id = $1")
            .bind(device_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Transition a device offline, but only if it is still online AND its
    /// last contact is still before `cutoff`.
    ///
    /// Re-checking staleness at write time makes the reconciliation scan
    /// level-triggered: a contact that lands between the scan's read and
    /// this write keeps the device online. Returns `true` when the
    /// transition fired.
    pub async fn mark_offline_if_stale(
        pool: &PgPool,
        device_id: &str,
        cutoff: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE devices SET status = $2 \
             WHERE device_id = $1 AND status = $3 AND last_contact < $4",
        )
        .bind(device_id)
        .bind(DeviceStatus::Offline.as_str())
        .bind(DeviceStatus::Online.as_str())
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    // ── Credential management ────────────────────────────────────────────

    /// Replace a device's API key hash and prefix.
    pub async fn set_api_key(
        pool: &PgPool,
        device_id: &str,
        api_key_hash: &str,
        api_key_prefix: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE devices SET api_key_hash = $2, api_key_prefix = $3 WHERE device_id = $1",
        )
        .bind(device_id)
        .bind(api_key_hash)
        .bind(api_key_prefix)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a device. Returns `true` when a row was removed.
    pub async fn delete(pool: &PgPool, device_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE device_id = $1")
            .bind(device_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
