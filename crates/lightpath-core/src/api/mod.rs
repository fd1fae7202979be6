//! REST API client module for the LightPath backend.
//!
//! `ApiClient` talks to `<origin>/api/core/<resource>/` with bearer token
//! authentication taken from the shared `SessionStore`, and to
//! `<origin>/api/token/` for login.
//!
//! Nothing here returns `Err` to the caller. Every failure is folded into an
//! `ApiResponse` carrying an `error` field, so callers make one check
//! (`response.error()`) whatever went wrong.

pub mod client;
pub mod error;
pub mod response;

pub use client::{ApiClient, BookingRequest, LoginRequest, PaymentRequest};
pub use error::ApiError;
pub use response::ApiResponse;
