//! Repository for the `readings` table. Readings are append-only; there are
//! no update or delete operations.

use sqlx::PgPool;

use crate::models::reading::{CreateReading, Reading};

/// Column list for `readings` queries.
const COLUMNS: &str = "id, device_id, heart_rate, spo2, bed_status, timestamp";

/// Insert and query operations for vitals readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Append one reading.
    pub async fn insert(pool: &PgPool, input: &CreateReading) -> Result<Reading, sqlx::Error> {
        let query = format!(
            "INSERT INTO readings (device_id, heart_rate, spo2, bed_status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(&input.device_id)
            .bind(input.heart_rate)
            .bind(input.spo2)
            .bind(input.bed_status)
            .fetch_one(pool)
            .await
    }

    /// The most recent `limit` readings for a device, oldest first.
    pub async fn recent_for_device(
        pool: &PgPool,
        device_id: &str,
        limit: i64,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                SELECT {COLUMNS} FROM readings \
                WHERE device_id = $1 ORDER BY timestamp DESC LIMIT $2 \
             ) recent ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(device_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every reading for a device in chronological order (CSV export).
    pub async fn all_for_device(
        pool: &PgPool,
        device_id: &str,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM readings WHERE device_id = $1 ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }

    /// Number of devices whose latest reading reported an occupied bed.
    pub async fn occupied_bed_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ( \
                SELECT DISTINCT ON (device_id) bed_status \
                FROM readings ORDER BY device_id, timestamp DESC \
             ) latest WHERE bed_status = 1",
        )
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
