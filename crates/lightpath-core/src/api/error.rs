use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure classes of a single request. `Display` is the exact text placed in
/// the `error` field of the returned `ApiResponse`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. `endpoint` is the caller's endpoint string.
    #[error("{method} {endpoint} failed: {}", .status.as_u16())]
    Status {
        method: Method,
        endpoint: String,
        status: StatusCode,
    },

    /// No response obtained at all.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The stored token cannot be sent as a header value.
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A response arrived but its body is not JSON.
    #[error("{0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn from_status(method: Method, endpoint: &str, status: StatusCode) -> Self {
        ApiError::Status {
            method,
            endpoint: endpoint.to_string(),
            status,
        }
    }

    pub fn invalid_json(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(format!("Invalid JSON response: {}", err))
    }
}
