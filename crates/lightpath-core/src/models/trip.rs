use serde::{Deserialize, Serialize};

use super::{lenient_i64, lenient_nested, lenient_string, BusRoute};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub route: Option<BusRoute>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub departure_time: Option<String>,
    /// Decimal fare, as text so no precision is lost.
    #[serde(default, deserialize_with = "lenient_string")]
    pub fare: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub available_seats: Option<i64>,
}

impl Trip {
    pub fn route_name(&self) -> Option<&str> {
        self.route.as_ref().and_then(|r| r.name.as_deref())
    }

    pub fn start_point(&self) -> Option<&str> {
        self.route.as_ref().and_then(|r| r.start_point.as_deref())
    }

    pub fn end_point(&self) -> Option<&str> {
        self.route.as_ref().and_then(|r| r.end_point.as_deref())
    }
}
