use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    access,
    auth::{self, CurrentUser},
    db::DbPool,
    error::AppError,
    models::{
        trip::{Collaborator, Trip, TripPayload, TripResponse, TripRow},
        user::User,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:id/collaborators", post(add_trip_collaborator))
}

async fn list_trips(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let trips = list_for_user(&state.db, &user.id).await?;
    Ok(Json(trips.into_iter().map(TripResponse::from).collect()))
}

async fn create_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TripPayload>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = create(&state.db, &user, &payload).await?;
    Ok(Json(trip.into()))
}

async fn get_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = access::load_trip_for(&state.db, &trip_id, &user.id).await?;
    Ok(Json(trip.into()))
}

async fn update_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
    Json(payload): Json<TripPayload>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = update(&state.db, &user, &trip_id, &payload).await?;
    Ok(Json(trip.into()))
}

async fn delete_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    delete(&state.db, &user, &trip_id).await?;
    Ok(Json(json!({ "message": "Trip deleted successfully" })))
}

#[derive(Debug, Deserialize)]
struct CollaboratorPayload {
    email: String,
}

async fn add_trip_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
    Json(payload): Json<CollaboratorPayload>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = add_collaborator(&state.db, &user, &trip_id, &payload.email).await?;
    Ok(Json(trip.into()))
}

/// All trips the user owns or collaborates on, newest first. The LIKE clause
/// is a coarse prefilter on the embedded collaborators document; the exact
/// predicate is applied after parsing.
pub async fn list_for_user(db: &DbPool, user_id: &str) -> Result<Vec<Trip>, AppError> {
    let rows: Vec<TripRow> = sqlx::query_as(
        "SELECT * FROM trips
         WHERE user_id = ?1 OR collaborators LIKE '%' || ?1 || '%'
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    let mut trips = Vec::with_capacity(rows.len());
    for row in rows {
        let trip = row.into_trip()?;
        if trip.has_access(user_id) {
            trips.push(trip);
        }
    }
    Ok(trips)
}

/// Create a trip owned by `owner`, who is always recorded as the first
/// collaborator with the owner role. Invited emails that match an existing
/// user join as editors; unknown emails are skipped.
pub async fn create(db: &DbPool, owner: &User, payload: &TripPayload) -> Result<Trip, AppError> {
    let mut collaborators = vec![Collaborator::owner(owner)];
    for email in &payload.collaborator_emails {
        let Some(invited) = auth::find_user_by_email(db, email).await? else {
            debug!("skipping unknown collaborator email {email}");
            continue;
        };
        if collaborators.iter().all(|c| c.user_id != invited.id) {
            collaborators.push(Collaborator::editor(&invited));
        }
    }

    let trip = Trip::new(owner, payload, collaborators);
    insert_trip(db, &trip).await?;
    Ok(trip)
}

pub async fn update(
    db: &DbPool,
    user: &User,
    trip_id: &str,
    payload: &TripPayload,
) -> Result<Trip, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;

    // `spent` and `collaborators` are never written through this path.
    sqlx::query(
        "UPDATE trips
         SET name = ?, destination = ?, start_date = ?, end_date = ?,
             cover_image = ?, budget = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.destination)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.cover_image)
    .bind(payload.budget)
    .bind(chrono::Utc::now())
    .bind(trip_id)
    .execute(db)
    .await?;

    access::load_trip(db, trip_id).await
}

/// Owner-only. The cascade to sub-resources is best-effort sequential, not
/// transactional; a crash mid-way can leave orphaned rows.
pub async fn delete(db: &DbPool, user: &User, trip_id: &str) -> Result<(), AppError> {
    access::load_trip_owned(db, trip_id, &user.id).await?;

    sqlx::query("DELETE FROM trips WHERE id = ?")
        .bind(trip_id)
        .execute(db)
        .await?;
    for statement in [
        "DELETE FROM destinations WHERE trip_id = ?",
        "DELETE FROM flights WHERE trip_id = ?",
        "DELETE FROM expenses WHERE trip_id = ?",
    ] {
        sqlx::query(statement).bind(trip_id).execute(db).await?;
    }
    Ok(())
}

/// Grant an existing user editor access. Any collaborator may invite;
/// already-present users are a no-op.
pub async fn add_collaborator(
    db: &DbPool,
    user: &User,
    trip_id: &str,
    email: &str,
) -> Result<Trip, AppError> {
    let trip = access::load_trip_for(db, trip_id, &user.id).await?;
    let invited = auth::find_user_by_email(db, email)
        .await?
        .ok_or(AppError::NotFound("user not found"))?;

    if trip.collaborators.iter().any(|c| c.user_id == invited.id) {
        return Ok(trip);
    }

    let mut collaborators = trip.collaborators.clone();
    collaborators.push(Collaborator::editor(&invited));
    let raw = serde_json::to_string(&collaborators).map_err(anyhow::Error::from)?;

    sqlx::query("UPDATE trips SET collaborators = ?, updated_at = ? WHERE id = ?")
        .bind(raw)
        .bind(chrono::Utc::now())
        .bind(trip_id)
        .execute(db)
        .await?;

    access::load_trip(db, trip_id).await
}

async fn insert_trip(db: &DbPool, trip: &Trip) -> Result<(), AppError> {
    let collaborators = serde_json::to_string(&trip.collaborators).map_err(anyhow::Error::from)?;
    sqlx::query(
        "INSERT INTO trips
            (id, user_id, name, destination, start_date, end_date, cover_image,
             budget, spent, collaborators, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&trip.id)
    .bind(&trip.user_id)
    .bind(&trip.name)
    .bind(&trip.destination)
    .bind(trip.start_date)
    .bind(trip.end_date)
    .bind(&trip.cover_image)
    .bind(trip.budget)
    .bind(trip.spent)
    .bind(collaborators)
    .bind(trip.created_at)
    .bind(trip.updated_at)
    .execute(db)
    .await?;
    Ok(())
}
