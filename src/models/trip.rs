use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{error::AppError, models::user::User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    Owner,
    #[default]
    Editor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: CollaboratorRole,
}

impl Collaborator {
    pub fn owner(user: &User) -> Self {
        Self::with_role(user, CollaboratorRole::Owner)
    }

    pub fn editor(user: &User) -> Self {
        Self::with_role(user, CollaboratorRole::Editor)
    }

    fn with_role(user: &User, role: CollaboratorRole) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub destination: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
    pub budget: f64,
    pub spent: f64,
    pub collaborators: Vec<Collaborator>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// The creator always starts out in `collaborators` with the owner role.
    pub fn new(owner: &User, payload: &TripPayload, collaborators: Vec<Collaborator>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: owner.id.clone(),
            name: payload.name.clone(),
            destination: payload.destination.clone(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            cover_image: payload.cover_image.clone(),
            budget: payload.budget,
            spent: 0.0,
            collaborators,
            created_at: now,
            updated_at: now,
        }
    }

    /// General read/write access: the owner or any listed collaborator.
    pub fn has_access(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.collaborators.iter().any(|c| c.user_id == user_id)
    }

    /// Owner-only actions (trip deletion) use this stricter predicate.
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Raw trip row; collaborators are stored as a JSON document on the row and
/// parsed fallibly rather than coerced.
#[derive(Debug, FromRow)]
pub struct TripRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub destination: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
    pub budget: f64,
    pub spent: f64,
    pub collaborators: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TripRow {
    pub fn into_trip(self) -> Result<Trip, AppError> {
        let collaborators: Vec<Collaborator> = serde_json::from_str(&self.collaborators)
            .map_err(|err| {
                AppError::Other(anyhow!("malformed collaborators on trip {}: {err}", self.id))
            })?;
        Ok(Trip {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            cover_image: self.cover_image,
            budget: self.budget,
            spent: self.spent,
            collaborators,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPayload {
    pub name: String,
    pub destination: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub collaborator_emails: Vec<String>,
}

/// Wire shape for trip reads; owner id and record timestamps stay internal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
    pub budget: f64,
    pub spent: f64,
    pub collaborators: Vec<Collaborator>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            name: trip.name,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            cover_image: trip.cover_image,
            budget: trip.budget,
            spent: trip.spent,
            collaborators: trip.collaborators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: "Test".to_string(),
            avatar: None,
            provider_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn trip_owned_by(owner: &User) -> Trip {
        let payload = TripPayload {
            name: "Tokyo".into(),
            destination: "Tokyo, Japan".into(),
            start_date: None,
            end_date: None,
            cover_image: None,
            budget: 1000.0,
            collaborator_emails: Vec::new(),
        };
        Trip::new(owner, &payload, vec![Collaborator::owner(owner)])
    }

    #[test]
    fn owner_has_access_and_ownership() {
        let alice = user("u-alice", "alice@example.com");
        let trip = trip_owned_by(&alice);
        assert!(trip.has_access(&alice.id));
        assert!(trip.is_owner(&alice.id));
    }

    #[test]
    fn collaborator_has_access_but_is_not_owner() {
        let alice = user("u-alice", "alice@example.com");
        let bob = user("u-bob", "bob@example.com");
        let mut trip = trip_owned_by(&alice);
        assert!(!trip.has_access(&bob.id));

        trip.collaborators.push(Collaborator::editor(&bob));
        assert!(trip.has_access(&bob.id));
        assert!(!trip.is_owner(&bob.id));
    }

    #[test]
    fn new_trip_starts_with_zero_spent_and_owner_collaborator() {
        let alice = user("u-alice", "alice@example.com");
        let trip = trip_owned_by(&alice);
        assert_eq!(trip.spent, 0.0);
        assert_eq!(trip.collaborators.len(), 1);
        assert_eq!(trip.collaborators[0].role, CollaboratorRole::Owner);
    }

    #[test]
    fn malformed_collaborators_document_is_reported() {
        let now = Utc::now();
        let row = TripRow {
            id: "t-1".into(),
            user_id: "u-1".into(),
            name: "Tokyo".into(),
            destination: "Tokyo, Japan".into(),
            start_date: None,
            end_date: None,
            cover_image: None,
            budget: 0.0,
            spent: 0.0,
            collaborators: "not json".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(row.into_trip().is_err());
    }

    #[test]
    fn collaborator_defaults_fill_missing_fields() {
        let parsed: Collaborator =
            serde_json::from_str(r#"{"userId":"u-1","email":"a@b.c","name":"A"}"#).unwrap();
        assert_eq!(parsed.role, CollaboratorRole::Editor);
        assert!(parsed.avatar.is_none());
    }
}
