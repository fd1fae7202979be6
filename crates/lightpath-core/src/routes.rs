//! Route table, route guard, and navigation history.
//!
//! The guard is evaluated on every navigation and never caches its decision.
//! Protected routes need an access token in the session store; unknown paths
//! fall back to the dashboard whatever the session holds. Redirects replace
//! the current history entry, so going back never lands on a route the guard
//! turned away.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::SessionStore;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Upper bound on redirects followed for a single navigation
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Trips { bus_id: String },
}

impl Route {
    /// Match a path against the route table. Query strings, fragments and a
    /// trailing slash are ignored; static segments match case-insensitively.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [login] if login.eq_ignore_ascii_case("login") => Some(Route::Login),
            [dashboard] if dashboard.eq_ignore_ascii_case("dashboard") => Some(Route::Dashboard),
            [trips, bus_id] if trips.eq_ignore_ascii_case("trips") => Some(Route::Trips {
                bus_id: bus_id.to_string(),
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::Trips { bus_id } => format!("/trips/{}", bus_id),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Outcome of guarding one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect { to: String, replace: bool },
}

/// Decides whether a path may be shown, based only on token presence.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let Some(route) = Route::parse(path) else {
            return Resolution::Redirect {
                to: DASHBOARD_PATH.to_string(),
                replace: true,
            };
        };

        if route.is_protected() && !self.session.is_authenticated() {
            return Resolution::Redirect {
                to: LOGIN_PATH.to_string(),
                replace: true,
            };
        }

        Resolution::Render(route)
    }
}

/// Navigation history with guard-aware push, replace, and back.
#[derive(Debug)]
pub struct Navigator {
    guard: RouteGuard,
    history: Vec<String>,
    current: Option<Route>,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            history: Vec::new(),
            current: None,
        }
    }

    /// Push `path` and follow any redirects. Returns the route that renders.
    pub fn navigate(&mut self, path: &str) -> Route {
        self.history.push(path.to_string());
        self.settle()
    }

    /// Replace the current entry with `path` and follow any redirects.
    pub fn replace(&mut self, path: &str) -> Route {
        match self.history.last_mut() {
            Some(top) => *top = path.to_string(),
            None => self.history.push(path.to_string()),
        }
        self.settle()
    }

    /// Drop the current entry and re-guard the previous one.
    /// Returns `None` when there is nothing to go back to.
    pub fn back(&mut self) -> Option<Route> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        Some(self.settle())
    }

    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn current_path(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn settle(&mut self) -> Route {
        for _ in 0..MAX_REDIRECTS {
            let path = self.history.last().cloned().unwrap_or_default();
            match self.guard.resolve(&path) {
                Resolution::Render(route) => {
                    debug!(path = %path, "Rendering route");
                    self.current = Some(route.clone());
                    return route;
                }
                Resolution::Redirect { to, replace } => {
                    debug!(from = %path, to = %to, "Redirecting");
                    match (replace, self.history.last_mut()) {
                        (true, Some(top)) => *top = to,
                        _ => self.history.push(to),
                    }
                }
            }
        }

        warn!("Redirect limit reached, showing login");
        if let Some(top) = self.history.last_mut() {
            *top = LOGIN_PATH.to_string();
        }
        self.current = Some(Route::Login);
        Route::Login
    }
}
