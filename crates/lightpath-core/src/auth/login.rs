//! Interpreting a token issuance response for the login form.

use crate::api::ApiResponse;

/// Shown when the backend rejects a login without saying why
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed! Check your credentials.";

/// Shown when the form is submitted with a blank field
pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "Email and password required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// An access token was issued. `refresh` may be missing.
    Authenticated {
        access: String,
        refresh: Option<String>,
    },
    /// No access token; the message to show on the form.
    Rejected(String),
}

impl LoginOutcome {
    /// Success is decided by the `access` field alone. The rejection message
    /// is `detail`, then `error`, then a generic fallback.
    pub fn from_response(response: &ApiResponse) -> Self {
        if let Some(access) = response.str_field("access").filter(|s| !s.is_empty()) {
            return LoginOutcome::Authenticated {
                access: access.to_string(),
                refresh: response.str_field("refresh").map(str::to_string),
            };
        }

        let message = [response.str_field("detail"), response.error()]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty())
            .unwrap_or(LOGIN_FAILED_MESSAGE);
        LoginOutcome::Rejected(message.to_string())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated { .. })
    }
}

/// Reject blank credentials before any request is made.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() || password.is_empty() {
        Err(CREDENTIALS_REQUIRED_MESSAGE)
    } else {
        Ok(())
    }
}
