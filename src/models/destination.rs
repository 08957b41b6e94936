use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub day: i64,
    pub time: String,
    pub notes: Option<String>,
    /// Duration at the stop, in minutes.
    pub duration: i64,
    /// Caller-assigned intra-day sequence; ties are left unresolved.
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Destination {
    pub fn new(trip_id: &str, payload: &DestinationPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            name: payload.name.clone(),
            address: payload.address.clone(),
            lat: payload.lat,
            lng: payload.lng,
            kind: payload.kind.clone(),
            day: payload.day,
            time: payload.time.clone(),
            notes: payload.notes.clone(),
            duration: payload.duration,
            order: payload.order,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPayload {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub day: i64,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default)]
    pub order: i64,
}

fn default_kind() -> String {
    "attraction".to_string()
}

fn default_duration() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_apply_at_the_boundary() {
        let payload: DestinationPayload = serde_json::from_str(
            r#"{"name":"Senso-ji","address":"2 Chome Asakusa","lat":35.71,"lng":139.79,"day":1,"time":"09:00"}"#,
        )
        .unwrap();
        assert_eq!(payload.kind, "attraction");
        assert_eq!(payload.duration, 60);
        assert_eq!(payload.order, 0);
        assert!(payload.notes.is_none());
    }

    #[test]
    fn kind_serializes_as_type_on_the_wire() {
        let dest = Destination::new(
            "t-1",
            &serde_json::from_str(
                r#"{"name":"Senso-ji","address":"2 Chome Asakusa","lat":35.71,"lng":139.79,"type":"temple","day":1,"time":"09:00"}"#,
            )
            .unwrap(),
        );
        let json = serde_json::to_value(&dest).unwrap();
        assert_eq!(json["type"], "temple");
        assert_eq!(json["tripId"], "t-1");
    }
}
