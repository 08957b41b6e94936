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
        flight::{Flight, FlightPayload},
        user::User,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trip/:trip_id", get(list_flights).post(create_flight))
        .route("/:id", put(update_flight).delete(delete_flight))
}

async fn list_flights(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(list_for_trip(&state.db, &user, &trip_id).await?))
}

async fn create_flight(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
    Json(payload): Json<FlightPayload>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(
        create_for_trip(&state.db, &user, &trip_id, &payload).await?,
    ))
}

async fn update_flight(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(flight_id): Path<String>,
    Json(payload): Json<FlightPayload>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(
        update_record(&state.db, &user, &flight_id, &payload).await?,
    ))
}

async fn delete_flight(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(flight_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    delete_record(&state.db, &user, &flight_id).await?;
    Ok(Json(json!({ "message": "Flight deleted successfully" })))
}

pub async fn list_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
) -> Result<Vec<Flight>, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;
    let flights = sqlx::query_as(
        "SELECT * FROM flights WHERE trip_id = ? ORDER BY date ASC, created_at ASC",
    )
    .bind(trip_id)
    .fetch_all(db)
    .await?;
    Ok(flights)
}

pub async fn create_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
    payload: &FlightPayload,
) -> Result<Flight, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;

    let flight = Flight::new(trip_id, payload);
    sqlx::query(
        r#"INSERT INTO flights
              (id, trip_id, airline, flight_number, "from", "to", depart_time,
               arrive_time, date, terminal, gate, confirmation, price, status,
               created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&flight.id)
    .bind(&flight.trip_id)
    .bind(&flight.airline)
    .bind(&flight.flight_number)
    .bind(&flight.from)
    .bind(&flight.to)
    .bind(&flight.depart_time)
    .bind(&flight.arrive_time)
    .bind(flight.date)
    .bind(&flight.terminal)
    .bind(&flight.gate)
    .bind(&flight.confirmation)
    .bind(flight.price)
    .bind(&flight.status)
    .bind(flight.created_at)
    .bind(flight.updated_at)
    .execute(db)
    .await?;
    Ok(flight)
}

pub async fn update_record(
    db: &DbPool,
    user: &User,
    flight_id: &str,
    payload: &FlightPayload,
) -> Result<Flight, AppError> {
    let existing = fetch_flight(db, flight_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query(
        r#"UPDATE flights
           SET airline = ?, flight_number = ?, "from" = ?, "to" = ?,
               depart_time = ?, arrive_time = ?, date = ?, terminal = ?,
               gate = ?, confirmation = ?, price = ?, status = ?, updated_at = ?
           WHERE id = ?"#,
    )
    .bind(&payload.airline)
    .bind(&payload.flight_number)
    .bind(&payload.from)
    .bind(&payload.to)
    .bind(&payload.depart_time)
    .bind(&payload.arrive_time)
    .bind(payload.date)
    .bind(&payload.terminal)
    .bind(&payload.gate)
    .bind(&payload.confirmation)
    .bind(payload.price)
    .bind(&payload.status)
    .bind(Utc::now())
    .bind(flight_id)
    .execute(db)
    .await?;

    fetch_flight(db, flight_id).await
}

pub async fn delete_record(db: &DbPool, user: &User, flight_id: &str) -> Result<(), AppError> {
    let existing = fetch_flight(db, flight_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query("DELETE FROM flights WHERE id = ?")
        .bind(flight_id)
        .execute(db)
        .await?;
    Ok(())
}

async fn fetch_flight(db: &DbPool, flight_id: &str) -> Result<Flight, AppError> {
    let flight: Option<Flight> = sqlx::query_as("SELECT * FROM flights WHERE id = ?")
        .bind(flight_id)
        .fetch_optional(db)
        .await?;
    flight.ok_or(AppError::NotFound("flight not found"))
}
