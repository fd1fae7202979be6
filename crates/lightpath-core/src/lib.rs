//! Core library for the LightPath bus booking client.
//!
//! - `auth`: durable session (access and refresh token) storage
//! - `api`: REST client with a uniform error-as-value response shape
//! - `routes`: route table, route guard, and navigation history
//! - `dashboard`: the dashboard aggregate fetch and its derived stats
//! - `trips`: per-bus trip listing and trip cards
//! - `state`: loading / failed / ready state of a data-backed view
//! - `models`: bus, trip, and weather shapes read from the backend
//! - `config`: backend origin and client settings

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod routes;
pub mod state;
pub mod trips;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResponse};
pub use auth::SessionStore;
pub use config::Config;
pub use dashboard::{DashboardData, DashboardState, DashboardStats};
pub use routes::{Navigator, Resolution, Route, RouteGuard};
pub use state::LoadState;
pub use trips::{TripCard, TripDetailState, TripsState};
