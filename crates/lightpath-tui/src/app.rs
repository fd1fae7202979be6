//! Application state management for the LightPath terminal client.
//!
//! `App` owns the session store, API client, and navigator, plus the state of
//! each view. Data loads run on spawned tasks and report back through an MPSC
//! channel that the main loop drains every tick.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lightpath_core::api::ApiResponse;
use lightpath_core::auth::{validate_credentials, LoginOutcome};
use lightpath_core::dashboard::{self, DashboardState};
use lightpath_core::routes::{Navigator, Route, RouteGuard, DASHBOARD_PATH};
use lightpath_core::trips::{self, TripDetailState, TripsState};
use lightpath_core::{ApiClient, Config, LoadState, SessionStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background result channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the go-to path prompt.
const MAX_PATH_LENGTH: usize = 200;

/// Environment variable that pre-fills the login email.
pub const EMAIL_ENV: &str = "LIGHTPATH_EMAIL";

// ============================================================================
// UI State Types
// ============================================================================

/// Overlay state on top of the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringPath,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Results sent back from background tasks.
enum LoadResult {
    Login(ApiResponse),
    Dashboard(DashboardState),
    Trips { bus_id: String, state: TripsState },
    TripDetail { trip_id: String, state: TripDetailState },
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub navigator: Navigator,

    pub state: AppState,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_pending: bool,

    // Dashboard
    pub dashboard: DashboardState,
    pub bus_selection: usize,

    // Trips for one bus
    pub trips_bus_id: Option<String>,
    pub trips: TripsState,
    pub trip_selection: usize,
    pub trip_detail: Option<(String, TripDetailState)>,

    // Go-to prompt
    pub path_input: String,

    pub status_message: Option<String>,

    /// Whether the config file is rewritten after a login
    persist_config: bool,

    result_tx: mpsc::Sender<LoadResult>,
    result_rx: mpsc::Receiver<LoadResult>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let session = Arc::new(SessionStore::open(config.cache_dir()?));
        let mut app = Self::with_session(config, session)?;
        app.persist_config = true;
        Ok(app)
    }

    pub fn with_session(config: Config, session: Arc<SessionStore>) -> Result<Self> {
        let api = ApiClient::new(&config, session.clone())?;
        let navigator = Navigator::new(RouteGuard::new(session.clone()));
        let (result_tx, result_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            navigator,
            state: AppState::Normal,
            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,
            login_pending: false,
            dashboard: LoadState::Loading,
            bus_selection: 0,
            trips_bus_id: None,
            trips: LoadState::Loading,
            trip_selection: 0,
            trip_detail: None,
            path_input: String::new(),
            status_message: None,
            persist_config: false,
            result_tx,
            result_rx,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn current_route(&self) -> Option<&Route> {
        self.navigator.current()
    }

    /// Navigate to `path` through the route guard and mount whatever renders.
    pub fn navigate(&mut self, path: &str) {
        let route = self.navigator.navigate(path);
        info!(path = path, route = %route.path(), "Navigated");
        self.mount(route);
    }

    /// Go back one history entry. The previous entry is guarded again.
    pub fn go_back(&mut self) {
        match self.navigator.back() {
            Some(route) => self.mount(route),
            None => self.status_message = Some("Nothing to go back to".to_string()),
        }
    }

    /// Reload the current view's data.
    pub fn reload(&mut self) {
        if let Some(route) = self.current_route().cloned() {
            self.mount(route);
        }
    }

    fn mount(&mut self, route: Route) {
        self.status_message = None;
        match route {
            Route::Login => self.start_login(),
            Route::Dashboard => {
                self.dashboard = LoadState::Loading;
                self.bus_selection = 0;
                let api = self.api.clone();
                self.spawn(async move { LoadResult::Dashboard(dashboard::load_dashboard(&api).await) });
            }
            Route::Trips { bus_id } => {
                self.trips = LoadState::Loading;
                self.trips_bus_id = Some(bus_id.clone());
                self.trip_selection = 0;
                self.trip_detail = None;
                let api = self.api.clone();
                self.spawn(async move {
                    let state = trips::load_trips(&api, &bus_id).await;
                    LoadResult::Trips { bus_id, state }
                });
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = LoadResult> + Send + 'static,
    {
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = task.await;
            if tx.send(result).await.is_err() {
                debug!("Result channel closed before load finished");
            }
        });
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Reset the login form for display
    pub fn start_login(&mut self) {
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
        self.login_pending = false;
    }

    /// Submit the login form. The request runs in the background.
    pub fn attempt_login(&mut self) {
        if self.login_pending {
            return;
        }
        if let Err(message) = validate_credentials(&self.login_email, &self.login_password) {
            self.login_error = Some(message.to_string());
            return;
        }

        self.login_error = None;
        self.login_pending = true;

        let api = self.api.clone();
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();
        self.spawn(async move { LoadResult::Login(api.login(&email, &password).await) });
    }

    fn finish_login(&mut self, response: ApiResponse) {
        self.login_pending = false;

        match LoginOutcome::from_response(&response) {
            LoginOutcome::Authenticated { access, refresh } => {
                // The client only saves when both tokens came back.
                if self.session.access_token().as_deref() != Some(access.as_str()) {
                    if let Err(e) = self
                        .session
                        .save_session(&access, refresh.as_deref().unwrap_or_default())
                    {
                        warn!(error = %e, "Failed to save session");
                    }
                }

                self.config.last_email = Some(self.login_email.trim().to_string());
                if self.persist_config {
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }

                self.login_password.clear();
                info!("Login successful");
                self.navigate(DASHBOARD_PATH);
            }
            LoginOutcome::Rejected(message) => {
                warn!(message = %message, "Login rejected");
                self.login_error = Some(message);
            }
        }
    }

    // =========================================================================
    // Trips
    // =========================================================================

    pub fn selected_bus_id(&self) -> Option<String> {
        self.dashboard
            .data()
            .and_then(|d| d.buses.get(self.bus_selection))
            .and_then(|bus| bus.bus_id.clone())
            .filter(|id| !id.is_empty())
    }

    /// Open the trips view for the selected bus. Buses without an id are
    /// ignored.
    pub fn view_selected_bus_trips(&mut self) {
        match self.selected_bus_id() {
            Some(bus_id) => self.navigate(&format!("/trips/{}", bus_id)),
            None => debug!("Selected bus has no id"),
        }
    }

    /// Fetch details of the selected trip into the side panel.
    pub fn open_selected_trip(&mut self) {
        let trip_id = self
            .trips
            .data()
            .and_then(|cards| cards.get(self.trip_selection))
            .and_then(|card| card.trip_id.clone());
        let Some(trip_id) = trip_id else {
            return;
        };

        self.trip_detail = Some((trip_id.clone(), LoadState::Loading));
        let api = self.api.clone();
        self.spawn(async move {
            let state = trips::load_trip_detail(&api, &trip_id).await;
            LoadResult::TripDetail { trip_id, state }
        });
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Apply every finished background load.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.process_result(result);
        }
    }

    fn process_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Login(response) => self.finish_login(response),
            LoadResult::Dashboard(state) => {
                if let Some(error) = state.error() {
                    warn!(error = error, "Dashboard failed to load");
                }
                self.dashboard = state;
            }
            LoadResult::Trips { bus_id, state } => {
                if self.trips_bus_id.as_deref() == Some(bus_id.as_str()) {
                    self.trips = state;
                } else {
                    debug!(bus_id = %bus_id, "Dropping trips for a bus no longer shown");
                }
            }
            LoadResult::TripDetail { trip_id, state } => {
                let still_open = matches!(&self.trip_detail, Some((current, _)) if *current == trip_id);
                if still_open {
                    self.trip_detail = Some((trip_id, state));
                }
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn bus_count(&self) -> usize {
        self.dashboard.data().map(|d| d.buses.len()).unwrap_or(0)
    }

    pub fn trip_count(&self) -> usize {
        self.trips.data().map(Vec::len).unwrap_or(0)
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for text input (printable, non-control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a go-to path character should be accepted
pub fn can_add_path_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PATH_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app(token: Option<&str>) -> App {
        let session = Arc::new(SessionStore::in_memory());
        if let Some(token) = token {
            session.save_session(token, "refresh").unwrap();
        }
        // Nothing listens here; loads fail fast and are never awaited in these tests.
        App::with_session(Config::with_base_url("http://127.0.0.1:1"), session).unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_start_shows_login() {
        let mut app = app(None);
        app.navigate("/dashboard");
        assert_eq!(app.current_route(), Some(&Route::Login));
    }

    #[tokio::test]
    async fn test_authenticated_start_shows_dashboard_loading() {
        let mut app = app(Some("tok"));
        app.navigate("/dashboard");
        assert_eq!(app.current_route(), Some(&Route::Dashboard));
        assert!(app.dashboard.is_loading());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let mut app = app(None);
        app.navigate("/login");
        app.login_email.clear();
        app.attempt_login();
        assert_eq!(app.login_error.as_deref(), Some("Email and password required"));
        assert!(!app.login_pending);
    }

    #[tokio::test]
    async fn test_login_rejection_keeps_storage_and_route() {
        let mut app = app(None);
        app.navigate("/login");
        app.process_result(LoadResult::Login(ApiResponse::new(json!({"detail": "Bad creds"}))));
        assert_eq!(app.login_error.as_deref(), Some("Bad creds"));
        assert!(!app.is_authenticated());
        assert_eq!(app.current_route(), Some(&Route::Login));
    }

    #[tokio::test]
    async fn test_login_success_navigates_to_dashboard() {
        let mut app = app(None);
        app.navigate("/login");
        app.login_password = "secret".to_string();
        app.process_result(LoadResult::Login(ApiResponse::new(
            json!({"access": "a", "refresh": "r"}),
        )));
        assert!(app.is_authenticated());
        assert_eq!(app.current_route(), Some(&Route::Dashboard));
        assert!(app.login_password.is_empty());
    }

    #[tokio::test]
    async fn test_stale_trips_result_dropped() {
        let mut app = app(Some("tok"));
        app.navigate("/trips/2");
        app.process_result(LoadResult::Trips {
            bus_id: "1".to_string(),
            state: LoadState::Ready(vec![]),
        });
        assert!(app.trips.is_loading());

        app.process_result(LoadResult::Trips {
            bus_id: "2".to_string(),
            state: LoadState::Failed("GET trips?bus=2 failed: 500".to_string()),
        });
        assert_eq!(app.trips.error(), Some("GET trips?bus=2 failed: 500"));
    }

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(0, '@'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
        assert!(!can_add_email_char(254, 'a'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_path_char() {
        assert!(can_add_path_char(0, '/'));
        assert!(!can_add_path_char(0, ' '));
        assert!(!can_add_path_char(200, 'a'));
    }
}
