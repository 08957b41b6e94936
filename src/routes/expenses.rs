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
        expense::{Expense, ExpensePayload},
        user::User,
    },
    spend,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trip/:trip_id", get(list_expenses).post(create_expense))
        .route("/:id", put(update_expense).delete(delete_expense))
}

async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(list_for_trip(&state.db, &user, &trip_id).await?))
}

async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(trip_id): Path<String>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Expense>, AppError> {
    Ok(Json(
        create_for_trip(&state.db, &user, &trip_id, &payload).await?,
    ))
}

async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<String>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Expense>, AppError> {
    Ok(Json(
        update_record(&state.db, &user, &expense_id, &payload).await?,
    ))
}

async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    delete_record(&state.db, &user, &expense_id).await?;
    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}

/// Newest first. Listing also revalidates the stored `spent` total, a
/// side-effecting read kept for compatibility with the original API.
pub async fn list_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
) -> Result<Vec<Expense>, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;
    let expenses = sqlx::query_as(
        "SELECT * FROM expenses WHERE trip_id = ? ORDER BY date DESC, created_at DESC",
    )
    .bind(trip_id)
    .fetch_all(db)
    .await?;

    spend::recompute_spent(db, trip_id).await?;
    Ok(expenses)
}

pub async fn create_for_trip(
    db: &DbPool,
    user: &User,
    trip_id: &str,
    payload: &ExpensePayload,
) -> Result<Expense, AppError> {
    access::load_trip_for(db, trip_id, &user.id).await?;

    let expense = Expense::new(trip_id, payload);
    sqlx::query(
        "INSERT INTO expenses
            (id, trip_id, category, amount, description, date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&expense.id)
    .bind(&expense.trip_id)
    .bind(&expense.category)
    .bind(expense.amount)
    .bind(&expense.description)
    .bind(expense.date)
    .bind(expense.created_at)
    .bind(expense.updated_at)
    .execute(db)
    .await?;

    spend::recompute_spent(db, trip_id).await?;
    Ok(expense)
}

pub async fn update_record(
    db: &DbPool,
    user: &User,
    expense_id: &str,
    payload: &ExpensePayload,
) -> Result<Expense, AppError> {
    let existing = fetch_expense(db, expense_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query(
        "UPDATE expenses
         SET category = ?, amount = ?, description = ?, date = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&payload.category)
    .bind(payload.amount)
    .bind(&payload.description)
    .bind(payload.date)
    .bind(Utc::now())
    .bind(expense_id)
    .execute(db)
    .await?;

    spend::recompute_spent(db, &existing.trip_id).await?;
    fetch_expense(db, expense_id).await
}

pub async fn delete_record(db: &DbPool, user: &User, expense_id: &str) -> Result<(), AppError> {
    let existing = fetch_expense(db, expense_id).await?;
    access::load_trip_for(db, &existing.trip_id, &user.id).await?;

    sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(expense_id)
        .execute(db)
        .await?;

    spend::recompute_spent(db, &existing.trip_id).await?;
    Ok(())
}

async fn fetch_expense(db: &DbPool, expense_id: &str) -> Result<Expense, AppError> {
    let expense: Option<Expense> = sqlx::query_as("SELECT * FROM expenses WHERE id = ?")
        .bind(expense_id)
        .fetch_optional(db)
        .await?;
    expense.ok_or(AppError::NotFound("expense not found"))
}
