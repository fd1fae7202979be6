//! API client, login, and dashboard behaviour against a stub backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::{json, Value};

use lightpath_core::dashboard::load_dashboard;
use lightpath_core::trips::load_trips;
use lightpath_core::{ApiClient, Config, LoadState, SessionStore};

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    uri: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Stub {
    routes: Arc<HashMap<String, (u16, String)>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn new(routes: &[(&str, u16, Value)]) -> Self {
        let routes = routes
            .iter()
            .map(|(key, status, body)| (key.to_string(), (*status, body.to_string())))
            .collect();
        Self {
            routes: Arc::new(routes),
            seen: Arc::default(),
        }
    }

    fn with_raw(key: &str, status: u16, body: &str) -> Self {
        let mut routes = HashMap::new();
        routes.insert(key.to_string(), (status, body.to_string()));
        Self {
            routes: Arc::new(routes),
            seen: Arc::default(),
        }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    stub.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        uri: uri.to_string(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    });

    let key = format!("{} {}", method, uri);
    let (status, body) = stub
        .routes
        .get(&key)
        .cloned()
        .unwrap_or((404, r#"{"detail": "Not found."}"#.to_string()));
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn spawn(stub: Stub) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str, session: Arc<SessionStore>) -> ApiClient {
    ApiClient::new(&Config::with_base_url(base_url), session).unwrap()
}

fn logged_in(token: &str) -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::in_memory());
    session.save_session(token, "refresh-token").unwrap();
    session
}

#[tokio::test]
async fn test_non_success_status_becomes_error_value() {
    let stub = Stub::new(&[("GET /api/core/buses/", 500, json!({"detail": "boom"}))]);
    let api = client_for(&spawn(stub).await, logged_in("tok"));

    let response = api.get_buses().await;
    assert_eq!(response.error(), Some("GET buses failed: 500"));
    assert_eq!(response.as_value(), &json!({"error": "GET buses failed: 500"}));
}

#[tokio::test]
async fn test_every_endpoint_reports_fixed_format() {
    let api = client_for(&spawn(Stub::default()).await, logged_in("tok"));

    assert_eq!(api.get_trips(None).await.error(), Some("GET trips failed: 404"));
    assert_eq!(api.get_trips(Some("3")).await.error(), Some("GET trips?bus=3 failed: 404"));
    assert_eq!(api.get_trip_details("8").await.error(), Some("GET trips/8 failed: 404"));
    assert_eq!(api.get_bookings().await.error(), Some("GET bookings/my failed: 404"));
    assert_eq!(api.book_seat(1, 2, 3).await.error(), Some("POST bookings failed: 404"));
    assert_eq!(api.make_payment(1, 5.0, "card").await.error(), Some("POST payments failed: 404"));
    assert_eq!(api.get_profile("5").await.error(), Some("GET users/5 failed: 404"));
    assert_eq!(
        api.update_profile("5", &json!({"phone_number": "0240000000"})).await.error(),
        Some("POST users/5 failed: 404")
    );
    assert_eq!(api.get_weather().await.error(), Some("GET weather/current failed: 404"));
}

#[tokio::test]
async fn test_success_body_returned_verbatim() {
    let buses = json!([{"bus_id": 1, "capacity": 40, "extra": {"nested": true}}]);
    let stub = Stub::new(&[("GET /api/core/buses/", 200, buses.clone())]);
    let api = client_for(&spawn(stub).await, logged_in("tok"));

    let response = api.get_buses().await;
    assert!(response.error().is_none());
    assert_eq!(response.into_value(), buses);
}

#[tokio::test]
async fn test_bearer_header_and_content_type() {
    let stub = Stub::new(&[("GET /api/core/buses/", 200, json!([]))]);
    let api = client_for(&spawn(stub.clone()).await, logged_in("abc.def.ghi"));

    api.get_buses().await;
    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer abc.def.ghi"));
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_bearer_header_sent_without_token() {
    let stub = Stub::new(&[("GET /api/core/buses/", 401, json!({"detail": "no"}))]);
    let api = client_for(&spawn(stub.clone()).await, Arc::new(SessionStore::in_memory()));

    let response = api.get_buses().await;
    assert_eq!(response.error(), Some("GET buses failed: 401"));

    let seen = stub.seen();
    let authorization = seen[0].authorization.as_deref().expect("header must be present");
    assert_eq!(authorization.trim_end(), "Bearer");
}

#[tokio::test]
async fn test_trip_filter_urls() {
    let stub = Stub::new(&[
        ("GET /api/core/trips/", 200, json!([])),
        ("GET /api/core/trips/?bus=12", 200, json!([])),
    ]);
    let api = client_for(&spawn(stub.clone()).await, logged_in("tok"));

    assert!(api.get_trips(None).await.error().is_none());
    assert!(api.get_trips(Some("")).await.error().is_none());
    assert!(api.get_trips(Some("0")).await.error().is_none());
    assert!(api.get_trips(Some("12")).await.error().is_none());

    let uris: Vec<String> = stub.seen().into_iter().map(|s| s.uri).collect();
    assert_eq!(
        uris,
        [
            "/api/core/trips/",
            "/api/core/trips/",
            "/api/core/trips/",
            "/api/core/trips/?bus=12"
        ]
    );
}

#[tokio::test]
async fn test_post_bodies() {
    let stub = Stub::new(&[
        ("POST /api/core/bookings/", 201, json!({"id": 70})),
        ("POST /api/core/payments/", 201, json!({"id": 5})),
        ("POST /api/core/users/9/", 200, json!({"id": 9})),
    ]);
    let api = client_for(&spawn(stub.clone()).await, logged_in("tok"));

    assert_eq!(api.book_seat(4, 12, 9).await.as_value(), &json!({"id": 70}));
    assert_eq!(api.make_payment(70, 120.5, "momo").await.as_value(), &json!({"id": 5}));
    let profile = json!({"address": "East Legon", "phone_number": "0201234567"});
    assert_eq!(api.update_profile("9", &profile).await.as_value(), &json!({"id": 9}));

    let seen = stub.seen();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|s| s.method == "POST"));

    let bodies: Vec<Value> = seen
        .iter()
        .map(|s| serde_json::from_str(&s.body).unwrap())
        .collect();
    assert_eq!(bodies[0], json!({"trip_id": 4, "seat_number": 12, "passenger_id": 9}));
    assert_eq!(bodies[1], json!({"booking_id": 70, "amount": 120.5, "method": "momo"}));
    assert_eq!(bodies[2], profile);
}

#[tokio::test]
async fn test_network_failure_becomes_error_value() {
    // Nothing listens on port 1.
    let api = client_for("http://127.0.0.1:1", logged_in("tok"));

    let response = api.get_buses().await;
    let error = response.error().expect("network failure must produce an error");
    assert!(!error.is_empty());
    assert!(!error.contains("failed: "));

    let login = api.login("a@b.com", "pw").await;
    assert!(login.error().is_some());
}

#[tokio::test]
async fn test_non_json_success_becomes_error_value() {
    let stub = Stub::with_raw("GET /api/core/weather/current/", 200, "<html>oops</html>");
    let api = client_for(&spawn(stub).await, logged_in("tok"));

    let response = api.get_weather().await;
    assert!(response.error().unwrap().starts_with("Invalid JSON response"));
}

#[tokio::test]
async fn test_login_success_persists_tokens() {
    let stub = Stub::new(&[(
        "POST /api/token/",
        200,
        json!({"access": "new-access", "refresh": "new-refresh"}),
    )]);
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(SessionStore::open(dir.path()));
    let api = client_for(&spawn(stub.clone()).await, session.clone());

    let response = api.login("ama@example.com", "secret").await;
    assert_eq!(response.str_field("access"), Some("new-access"));
    assert_eq!(session.access_token().as_deref(), Some("new-access"));
    assert_eq!(session.refresh_token().as_deref(), Some("new-refresh"));

    let reopened = SessionStore::open(dir.path());
    assert_eq!(reopened.access_token().as_deref(), Some("new-access"));

    let seen = stub.seen();
    assert_eq!(seen[0].authorization, None);
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, json!({"email": "ama@example.com", "password": "secret"}));
}

#[tokio::test]
async fn test_login_unwritable_session_file_keeps_memory_session() {
    let stub = Stub::new(&[(
        "POST /api/token/",
        200,
        json!({"access": "mem-access", "refresh": "mem-refresh"}),
    )]);
    // A plain file where the session directory should be makes the write fail.
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let session = Arc::new(SessionStore::open(blocker.path()));
    let api = client_for(&spawn(stub).await, session.clone());

    let response = api.login("ama@example.com", "secret").await;
    assert_eq!(response.str_field("access"), Some("mem-access"));
    assert!(response.error().is_none());
    assert_eq!(session.access_token().as_deref(), Some("mem-access"));
    assert_eq!(session.refresh_token().as_deref(), Some("mem-refresh"));
}

#[tokio::test]
async fn test_login_failure_leaves_storage_untouched() {
    let stub = Stub::new(&[(
        "POST /api/token/",
        401,
        json!({"detail": "No active account found with the given credentials"}),
    )]);
    let session = logged_in("old-access");
    let api = client_for(&spawn(stub).await, session.clone());

    let response = api.login("ama@example.com", "wrong").await;
    assert_eq!(
        response.str_field("detail"),
        Some("No active account found with the given credentials")
    );
    assert!(response.error().is_none());
    assert_eq!(session.access_token().as_deref(), Some("old-access"));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-token"));
}

#[tokio::test]
async fn test_login_access_without_refresh_not_persisted() {
    let stub = Stub::new(&[("POST /api/token/", 200, json!({"access": "only-access"}))]);
    let session = Arc::new(SessionStore::in_memory());
    let api = client_for(&spawn(stub).await, session.clone());

    let response = api.login("ama@example.com", "secret").await;
    assert_eq!(response.str_field("access"), Some("only-access"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_dashboard_aggregate() {
    let stub = Stub::new(&[
        ("GET /api/core/buses/", 200, json!([{"bus_id": 1, "capacity": 40}, {"bus_id": 2, "capacity": 50}])),
        ("GET /api/core/trips/", 200, json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}])),
        ("GET /api/core/bookings/my/", 200, json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        ("GET /api/core/weather/current/", 200, json!([{"location": "Accra", "condition": "Sunny", "temperature": 31}])),
    ]);
    let api = client_for(&spawn(stub.clone()).await, logged_in("tok"));

    let state = load_dashboard(&api).await;
    let data = state.data().expect("dashboard should load");
    assert_eq!(data.stats.available_seats, 87);
    assert_eq!(data.stats.trips_today, 4);
    assert_eq!(data.stats.bookings, 3);
    assert_eq!(data.weather.len(), 1);
    assert_eq!(stub.seen().len(), 4);
}

#[tokio::test]
async fn test_dashboard_bus_failure_discards_everything() {
    let stub = Stub::new(&[
        ("GET /api/core/buses/", 503, json!({})),
        ("GET /api/core/trips/", 200, json!([{"id": 1}])),
        ("GET /api/core/bookings/my/", 200, json!([{"id": 1}])),
        ("GET /api/core/weather/current/", 200, json!([])),
    ]);
    let api = client_for(&spawn(stub.clone()).await, logged_in("tok"));

    let state = load_dashboard(&api).await;
    assert_eq!(state, LoadState::Failed("GET buses failed: 503".to_string()));
    assert_eq!(stub.seen().len(), 4);
}

#[tokio::test]
async fn test_trips_for_bus() {
    let stub = Stub::new(&[(
        "GET /api/core/trips/?bus=7",
        200,
        json!({"count": 1, "results": [{"id": 3, "fare": "55.00", "available_seats": 20}]}),
    )]);
    let api = client_for(&spawn(stub).await, logged_in("tok"));

    let state = load_trips(&api, "7").await;
    let cards = state.data().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].route_name, "N/A");
    assert_eq!(cards[0].fare.as_deref(), Some("55.00"));
}
