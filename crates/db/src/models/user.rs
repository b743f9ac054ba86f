//! Operator account entity model.

use serde::Serialize;
use sqlx::FromRow;
use wardsight_core::types::{DbId, Timestamp};

/// A dashboard user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}
