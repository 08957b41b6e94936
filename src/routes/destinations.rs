use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    access,
    auth::CurrentUser,
    db::DbPool,
    error::AppError,
    models::{
        destination::{Destination, DestinationPayload},
        user::User,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/trip/:trip_id",
            get(list_destinations).post(create_destination),
        )
        .route("/:id", put(update_destination).delete(delete_destination))
}

async fn list_destinations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Destination>>, AppError> {
    Ok(Json(list_for_trip(&state.db, &user, &trip_id).await?))
}

async fn create_destination(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
    Json(payload): Json<DestinationPayload>,
) -> Result<Json<Destination>, AppError> {
    Ok(Json(
        create_for_trip(&state.db, &user, &trip_id, &payload).await?,
    ))
}

async fn update_destination(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(destination_id): Path<String>,
    Json(payload): Json<DestinationPayload>,
) -> Result<Json<Destination>, AppError> {
    Ok(Json(
        update_record(&state.db, &user, &destination_id, &payload).await?,
    ))
}

async fn delete_destination(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(destination_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    delete_record(&state.db, &user, &destination_id).await?;
    Ok(Json(json!({ "message": "Destination deleted successfully" })))
}

/// Itinerary order: by day, then by the caller-assigned intra-day sequence.
/// Insertion order breaks remaining ties so the listing is stable.
pub async fn list_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
) -> Result<Vec<Destination>, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;
    let destinations = sqlx::query_as(
        r#"SELECT * FROM destinations WHERE trip_id = ?
           ORDER BY day ASC, "order" ASC, created_at ASC"#,
    )
    .bind(trip_id)
    .fetch_all(db)
    .await?;
    Ok(destinations)
}

pub async fn create_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
    payload: &DestinationPayload,
) -> Result<Destination, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;

    let destination = Destination::new(trip_id, payload);
    sqlx::query(
        r#"INSERT INTO destinations
              (id, trip_id, name, address, lat, lng, kind, day, time, notes,
               duration, "order", created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&destination.id)
    .bind(&destination.trip_id)
    .bind(&destination.name)
    .bind(&destination.address)
    .bind(destination.lat)
    .bind(destination.lng)
    .bind(&destination.kind)
    .bind(destination.day)
    .bind(&destination.time)
    .bind(&destination.notes)
    .bind(destination.duration)
    .bind(destination.order)
    .bind(destination.created_at)
    .bind(destination.updated_at)
    .execute(db)
    .await?;
    Ok(destination)
}

pub async fn update_record(
    db: &DbPool,
    user: &User,
    destination_id: &str,
    payload: &DestinationPayload,
) -> Result<Destination, AppError> {
    let existing = fetch_destination(db, destination_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query(
        r#"UPDATE destinations
           SET name = ?, address = ?, lat = ?, lng = ?, kind = ?, day = ?,
               time = ?, notes = ?, duration = ?, "order" = ?, updated_at = ?
           WHERE id = ?"#,
    )
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(payload.lat)
    .bind(payload.lng)
    .bind(&payload.kind)
    .bind(payload.day)
    .bind(&payload.time)
    .bind(&payload.notes)
    .bind(payload.duration)
    .bind(payload.order)
    .bind(Utc::now())
    .bind(destination_id)
    .execute(db)
    .await?;

    fetch_destination(db, destination_id).await
}

pub async fn delete_record(
    db: &DbPool,
    user: &User,
    destination_id: &str,
) -> Result<(), AppError> {
    let existing = fetch_destination(db, destination_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query("DELETE FROM destinations WHERE id = ?")
        .bind(destination_id)
        .execute(db)
        .await?;
    Ok(())
}

async fn fetch_destination(db: &DbPool, destination_id: &str) -> Result<Destination, AppError> {
    let destination: Option<Destination> =
        sqlx::query_as("SELECT * FROM destinations WHERE id = ?")
            .bind(destination_id)
            .fetch_optional(db)
            .await?;
    destination.ok_or(AppError::NotFound("destination not found"))
}
