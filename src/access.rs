//! Trip access checks, applied before every read or write on a trip or its
//! sub-resources. Existence is checked first, so an authenticated caller can
//! distinguish a missing trip (404) from one they cannot touch (403).

use crate::{
    db::DbPool,
    error::AppError,
    models::trip::{Trip, TripRow},
};

/// Fetch a trip by id; malformed or unknown ids are both "not found".
pub async fn load_trip(db: &DbPool, trip_id: &str) -> Result<Trip, AppError> {
    let row: Option<TripRow> = sqlx::query_as("SELECT * FROM trips WHERE id = ?")
        .bind(trip_id)
        .fetch_optional(db)
        .await?;
    row.ok_or(AppError::NotFound("trip not found"))?.into_trip()
}

/// Fetch a trip the user may read or write: the owner or any collaborator.
pub async fn load_trip_for(db: &DbPool, trip_id: &str, user_id: &str) -> Result<Trip, AppError> {
    let trip = load_trip(db, trip_id).await?;
    if !trip.has_access(user_id) {
        return Err(AppError::Forbidden("access denied"));
    }
    Ok(trip)
}

/// Fetch a trip for an owner-only action. Collaborator status does not
/// relax this check.
pub async fn load_trip_owned(db: &DbPool, trip_id: &str, user_id: &str) -> Result<Trip, AppError> {
    let trip = load_trip(db, trip_id).await?;
    if !trip.is_owner(user_id) {
        return Err(AppError::Forbidden("only the owner can delete a trip"));
    }
    Ok(trip)
}
