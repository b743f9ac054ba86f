//! Repository for the `audit_log` table.

use sqlx::PgPool;
use wardsight_core::types::DbId;

/// Append-only activity log writes.
pub struct AuditRepo;

impl AuditRepo {
    /// Record an operator action.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        details: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO audit_log (user_id, action, details) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(action)
            .bind(details)
            .execute(pool)
            .await?;
        Ok(())
    }
}
