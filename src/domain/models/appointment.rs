use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_instagram: Option<String>,
    /// `None` once the referenced service has been deleted.
    pub service_id: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub client_name: String,
    pub client_phone: String,
    pub client_instagram: Option<String>,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: params.client_name,
            client_phone: params.client_phone,
            client_instagram: params.client_instagram,
            service_id: Some(params.service_id),
            date: params.date,
            time: params.time,
            created_at: Utc::now(),
        }
    }
}

/// `HH:MM` wire format for times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let appointment = Appointment::new(NewAppointmentParams {
            client_name: "Ana".into(),
            client_phone: "11 99999-0000".into(),
            client_instagram: None,
            service_id: "svc".into(),
            date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
            time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        });

        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["time"], "09:15");
        assert_eq!(json["date"], "2030-03-04");
        assert_eq!(json["clientName"], "Ana");
        assert_eq!(json["serviceId"], "svc");

        let back: Appointment = serde_json::from_value(json).unwrap();
        assert_eq!(back.time, appointment.time);
    }
}
