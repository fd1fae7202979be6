use serde::{Deserialize, Serialize};

use super::{lenient_i64, lenient_nested, lenient_string};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub bus_id: Option<String>,
    #[serde(default, alias = "number_plate", deserialize_with = "lenient_string")]
    pub registration_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub conductor: Option<Conductor>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub route: Option<BusRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conductor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
}

/// Route summary embedded in buses and trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_point: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_point: Option<String>,
}

impl Bus {
    /// Seats counted toward the dashboard total. Missing capacity counts as 0.
    pub fn seat_capacity(&self) -> i64 {
        self.capacity.unwrap_or(0)
    }

    pub fn conductor_display(&self) -> String {
        self.conductor
            .as_ref()
            .and_then(|c| c.full_name.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn route_display(&self) -> String {
        self.route
            .as_ref()
            .map(BusRoute::summary)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl BusRoute {
    /// `"Name (Start → End)"`
    pub fn summary(&self) -> String {
        format!(
            "{} ({} → {})",
            self.name.as_deref().unwrap_or(""),
            self.start_point.as_deref().unwrap_or(""),
            self.end_point.as_deref().unwrap_or("")
        )
    }
}
