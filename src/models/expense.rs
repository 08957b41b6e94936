use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub trip_id: String,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(trip_id: &str, payload: &ExpensePayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            category: payload.category.clone(),
            amount: payload.amount,
            description: payload.description.clone(),
            date: payload.date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub category: String,
    pub amount: f64,
    pub description: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}
