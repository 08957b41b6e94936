use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub trip_id: String,
    pub airline: String,
    pub flight_number: String,
    pub from: String,
    pub to: String,
    pub depart_time: String,
    pub arrive_time: String,
    pub date: DateTime<Utc>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub confirmation: Option<String>,
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    pub fn new(trip_id: &str, payload: &FlightPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            airline: payload.airline.clone(),
            flight_number: payload.flight_number.clone(),
            from: payload.from.clone(),
            to: payload.to.clone(),
            depart_time: payload.depart_time.clone(),
            arrive_time: payload.arrive_time.clone(),
            date: payload.date,
            terminal: payload.terminal.clone(),
            gate: payload.gate.clone(),
            confirmation: payload.confirmation.clone(),
            price: payload.price,
            status: payload.status.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPayload {
    pub airline: String,
    pub flight_number: String,
    pub from: String,
    pub to: String,
    pub depart_time: String,
    pub arrive_time: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub terminal: Option<String>,
    #[serde(default)]
    pub gate: Option<String>,
    #[serde(default)]
    pub confirmation: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "Confirmed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_apply_at_the_boundary() {
        let payload: FlightPayload = serde_json::from_str(
            r#"{"airline":"ANA","flightNumber":"NH 110","from":"SFO","to":"HND",
                "departTime":"11:05","arriveTime":"14:25","date":"2026-09-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.status, "Confirmed");
    }

    #[test]
    fn endpoints_keep_their_natural_names_on_the_wire() {
        let payload: FlightPayload = serde_json::from_str(
            r#"{"airline":"ANA","flightNumber":"NH 110","from":"SFO","to":"HND",
                "departTime":"11:05","arriveTime":"14:25","date":"2026-09-01T00:00:00Z"}"#,
        )
        .unwrap();
        let flight = Flight::new("t-1", &payload);
        let json = serde_json::to_value(&flight).unwrap();
        assert_eq!(json["from"], "SFO");
        assert_eq!(json["to"], "HND");
    }
}
