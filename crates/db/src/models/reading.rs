//! Vitals reading entity model.

use serde::Serialize;
use sqlx::FromRow;
use wardsight_core::types::{DbId, Timestamp};

/// One vitals sample from the `readings` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reading {
    pub id: DbId,
    pub device_id: String,
    pub heart_rate: f64,
    pub spo2: f64,
    /// Bed occupancy flag: 0 = empty, 1 = occupied.
    pub bed_status: i16,
    pub timestamp: Timestamp,
}

/// DTO for inserting a reading.
#[derive(Debug, Clone)]
pub struct CreateReading {
    pub device_id: String,
    pub heart_rate: f64,
    pub spo2: f64,
    pub bed_status: i16,
}
