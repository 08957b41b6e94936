use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Expiry is fixed at creation; it is never extended by use.
    pub fn new(user_id: &str, session_token: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_token: session_token.to_string(),
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_not_expired() {
        let session = Session::new("user-1", "tok");
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn session_past_expiry_is_expired() {
        let mut session = Session::new("user-1", "tok");
        session.expires_at = Utc::now() - Duration::minutes(1);
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn session_at_exact_expiry_is_expired() {
        let session = Session::new("user-1", "tok");
        assert!(session.is_expired(session.expires_at));
    }
}
