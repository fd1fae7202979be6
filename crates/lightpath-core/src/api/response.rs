use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use super::ApiError;

/// A parsed backend response, or the uniform `{"error": "..."}` failure shape.
///
/// The body is kept verbatim. Check `error()` before treating it as data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApiResponse(Value);

impl ApiResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build the failure shape from a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self(json!({ "error": message.into() }))
    }

    /// The `error` field, when the body carries one as a string.
    pub fn error(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Look up a top-level string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The list payload: the body itself when it is an array, otherwise its
    /// `results` array (paginated responses).
    pub fn list(&self) -> Option<&Vec<Value>> {
        match &self.0 {
            Value::Array(items) => Some(items),
            Value::Object(map) => map.get("results").and_then(Value::as_array),
            _ => None,
        }
    }

    /// Number of list items, 0 when the body is not a list.
    pub fn count(&self) -> usize {
        self.list().map(Vec::len).unwrap_or(0)
    }

    /// Decode every list item as `T`, skipping items that do not fit.
    pub fn items<T: DeserializeOwned>(&self) -> Vec<T> {
        let Some(items) = self.list() else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(error = %e, "Skipping list item with unexpected shape");
                    None
                }
            })
            .collect()
    }

    /// Decode the whole body as `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.0.clone()).ok()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        Self::failure(err.to_string())
    }
}

impl From<Value> for ApiResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
