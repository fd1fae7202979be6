//! Data models for LightPath backend entities.
//!
//! Only the shapes the client actually renders are typed here:
//!
//! - `Bus`, `Conductor`, `BusRoute`: the dashboard bus table
//! - `Trip`: the per-bus trip list
//! - `WeatherSample`: the dashboard weather overview
//!
//! Bookings, payments, and profiles pass through as raw JSON inside an
//! `ApiResponse`. Ids arrive as numbers or strings and are kept as strings.

pub mod bus;
pub mod trip;
pub mod weather;

pub use bus::{Bus, BusRoute, Conductor};
pub use trip::Trip;
pub use weather::WeatherSample;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string, number, or bool and keep its text form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept an integer given as a number or a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept a nested object of type `T`. Anything that does not fit becomes
/// `None` instead of failing the enclosing item.
pub(crate) fn lenient_nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
