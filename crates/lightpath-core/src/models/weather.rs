use serde::{Deserialize, Serialize};

use super::lenient_string;

/// One entry of the dashboard weather overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    #[serde(default, alias = "city", deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, alias = "weather", deserialize_with = "lenient_string")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

impl WeatherSample {
    /// Condition followed by the temperature in Celsius.
    pub fn summary(&self) -> String {
        format!(
            "{} — {}°C",
            self.condition.as_deref().unwrap_or(""),
            self.temperature.as_deref().unwrap_or("")
        )
    }
}
