//! Authentication: session storage and login handling.
//!
//! This module provides:
//! - `SessionStore`: the access and refresh tokens issued at login, persisted
//!   to disk so they survive restarts
//! - `LoginOutcome`: how a token issuance response reads to the login form
//!
//! The presence of an access token is the only signal of "authenticated";
//! tokens are never validated, refreshed, or expired on the client.

pub mod login;
pub mod session;

pub use login::{validate_credentials, LoginOutcome};
pub use session::{SessionData, SessionStore};
