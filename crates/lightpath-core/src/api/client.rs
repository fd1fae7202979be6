//! API client for the LightPath REST backend.
//!
//! This module provides the `ApiClient` struct: generic authenticated GET and
//! POST, the unauthenticated login call, and one method per backend resource.

use std::sync::Arc;

use anyhow::Result;
use reqwest::{header, Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::config::Config;

use super::{ApiError, ApiResponse};

/// Body of the token issuance request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub trip_id: i64,
    pub seat_number: u32,
    pub passenger_id: i64,
}

/// Body of `POST payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub booking_id: i64,
    pub amount: f64,
    pub method: String,
}

/// API client for the LightPath backend.
/// Clone is cheap - reqwest::Client and the session store are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_root: String,
    token_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the configured backend, reading tokens from `session`.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            token_url: config.token_url(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Full URL for an endpoint such as `buses` or `trips?bus=3`.
    /// The path always ends in a slash; any query goes after it.
    fn endpoint_url(&self, endpoint: &str) -> String {
        let (path, query) = match endpoint.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (endpoint, None),
        };
        let path = path.trim_matches('/');

        match query {
            Some(query) => format!("{}/{}/?{}", self.api_root, path, query),
            None => format!("{}/{}/", self.api_root, path),
        }
    }

    /// JSON content type plus the bearer token. A missing token is sent as an
    /// empty bearer value rather than dropping the header.
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let token = self.session.access_token().unwrap_or_default();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(headers)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(endpoint);
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(method, endpoint, status));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ApiError::invalid_json)
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResponse {
        match self.send(method.clone(), endpoint, body).await {
            Ok(value) => ApiResponse::new(value),
            Err(e) => {
                warn!(method = %method, endpoint = endpoint, error = %e, "Request failed");
                e.into()
            }
        }
    }

    /// Authenticated GET.
    pub async fn get(&self, endpoint: &str) -> ApiResponse {
        self.request::<()>(Method::GET, endpoint, None).await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ApiResponse {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    // ===== Authentication =====

    /// Exchange email and password for a token pair.
    ///
    /// The body is returned as parsed whatever the status. When it holds both
    /// `access` and `refresh`, they are written to the session store first.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.send_login(&body).await {
            Ok(value) => ApiResponse::new(value),
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return e.into();
            }
        };

        let access = response.str_field("access").filter(|s| !s.is_empty());
        let refresh = response.str_field("refresh").filter(|s| !s.is_empty());
        if let (Some(access), Some(refresh)) = (access, refresh) {
            if let Err(e) = self.session.save_session(access, refresh) {
                debug!(error = %e, "Session kept in memory only");
            }
            info!("Login succeeded, session saved");
        }

        response
    }

    async fn send_login(&self, body: &LoginRequest) -> Result<Value, ApiError> {
        debug!(url = %self.token_url, "Sending login request");
        let response = self
            .client
            .post(&self.token_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ApiError::invalid_json)
    }

    // ===== Buses & Trips =====

    pub async fn get_buses(&self) -> ApiResponse {
        self.get("buses").await
    }

    /// All trips, or only those of one bus when `bus_id` is set.
    pub async fn get_trips(&self, bus_id: Option<&str>) -> ApiResponse {
        self.get(&trips_endpoint(bus_id)).await
    }

    pub async fn get_trip_details(&self, trip_id: &str) -> ApiResponse {
        self.get(&format!("trips/{}", trip_id)).await
    }

    // ===== Bookings & Payments =====

    /// The current user's bookings.
    pub async fn get_bookings(&self) -> ApiResponse {
        self.get("bookings/my").await
    }

    pub async fn book_seat(&self, trip_id: i64, seat_number: u32, passenger_id: i64) -> ApiResponse {
        let body = BookingRequest {
            trip_id,
            seat_number,
            passenger_id,
        };
        self.post("bookings", &body).await
    }

    pub async fn make_payment(&self, booking_id: i64, amount: f64, method: &str) -> ApiResponse {
        let body = PaymentRequest {
            booking_id,
            amount,
            method: method.to_string(),
        };
        self.post("payments", &body).await
    }

    // ===== Profile =====

    pub async fn get_profile(&self, user_id: &str) -> ApiResponse {
        self.get(&format!("users/{}", user_id)).await
    }

    /// Sends `data` as the body unchanged.
    pub async fn update_profile<B: Serialize + ?Sized>(&self, user_id: &str, data: &B) -> ApiResponse {
        self.post(&format!("users/{}", user_id), data).await
    }

    // ===== Weather =====

    pub async fn get_weather(&self) -> ApiResponse {
        self.get("weather/current").await
    }
}

/// Endpoint for the trip list. Empty and `"0"` bus ids mean "no filter".
pub fn trips_endpoint(bus_id: Option<&str>) -> String {
    match bus_id.map(str::trim) {
        Some(id) if !id.is_empty() && id != "0" => format!("trips?bus={}", id),
        _ => "trips".to_string(),
    }
}
