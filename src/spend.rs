//! Derived-aggregate maintenance for `trips.spent`.

use chrono::Utc;

use crate::{db::DbPool, error::AppError};

/// Recompute a trip's `spent` total from its current expense set and persist
/// it. Always a full recomputation, never an incremental delta, so it is
/// idempotent and self-heals any prior drift regardless of which mutation
/// triggered it.
///
/// Read-then-write is not atomic: concurrent expense mutations on the same
/// trip race here and the last writer wins. Accepted weak consistency, kept
/// for wire compatibility with the original service.
pub async fn recompute_spent(db: &DbPool, trip_id: &str) -> Result<f64, AppError> {
    let total: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE trip_id = ?")
            .bind(trip_id)
            .fetch_one(db)
            .await?;

    sqlx::query("UPDATE trips SET spent = ?, updated_at = ? WHERE id = ?")
        .bind(total)
        .bind(Utc::now())
        .bind(trip_id)
        .execute(db)
        .await?;

    Ok(total)
}
