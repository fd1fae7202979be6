use chrono::{DateTime, Local, NaiveDateTime};

/// Placeholder for missing values in tables and cards
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency prefix for fares
const CURRENCY: &str = "GHS";

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// The value, or "N/A" when missing or empty
pub fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render a backend timestamp in local time.
/// Falls back to the raw text when it is not a recognizable timestamp.
pub fn format_datetime(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return naive.format("%b %d, %Y %H:%M").to_string();
    }
    timestamp.to_string()
}

pub fn format_fare(fare: Option<&str>) -> String {
    format!("{} {}", CURRENCY, fare.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Accra → Kumasi", 9), "Accra ...");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some("Accra")), "Accra");
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(None), "N/A");
    }

    #[test]
    fn test_format_datetime_naive() {
        assert_eq!(format_datetime("2025-03-01T08:30:00"), "Mar 01, 2025 08:30");
    }

    #[test]
    fn test_format_datetime_unparseable() {
        assert_eq!(format_datetime("tomorrow"), "tomorrow");
        assert_eq!(format_datetime(""), "");
    }

    #[test]
    fn test_format_fare() {
        assert_eq!(format_fare(Some("120.50")), "GHS 120.50");
        assert_eq!(format_fare(None), "GHS ");
    }
}
