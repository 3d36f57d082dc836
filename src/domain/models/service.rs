use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Longest service the calendar accepts, one full day.
pub const MAX_DURATION_MIN: i32 = 24 * 60;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(rename = "price", with = "money")]
    pub price_cents: i64,
    pub duration: i32,
}

impl Service {
    pub fn new(name: String, price_cents: i64, duration: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            price_cents,
            duration,
        }
    }

    /// Duration in minutes, `None` when the stored value cannot occupy the calendar.
    pub fn duration_min(&self) -> Option<u32> {
        u32::try_from(self.duration).ok().filter(|d| *d > 0)
    }
}

/// Converts a decimal currency amount into whole cents.
pub fn cents_from_amount(amount: f64) -> Option<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Prices travel as JSON numbers with two decimals and are stored as cents.
pub mod money {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        super::cents_from_amount(amount)
            .ok_or_else(|| D::Error::custom("price must be a non-negative amount"))
    }
}
