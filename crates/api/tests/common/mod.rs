#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use bugboard_api::auth::jwt::JwtConfig;
use bugboard_api::config::ServerConfig;
use bugboard_api::middleware::session::resolve_session;
use bugboard_api::routes;
use bugboard_api::state::AppState;
use bugboard_core::types::DbId;
use bugboard_db::models::project::CreateProject;
use bugboard_db::models::user::CreateUser;
use bugboard_db::{MemoryStore, Store};

/// Build a test `ServerConfig` with fixed, distinct token secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            access_secret: "integration-access-secret".to_string(),
            refresh_secret: "integration-refresh-secret".to_string(),
            cookie_secure: false,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses. The state is returned
/// too so tests can seed data and subscribe to the broker directly.
pub fn build_test_app() -> (Router, AppState) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let state = AppState::new(store, test_config());

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest(
            "/api/v1",
            routes::api_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                resolve_session,
            )),
        )
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state.clone());

    (app, state)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, None, cookie).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), cookie).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), cookie).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// Raw `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Value of the cookie `name` set by a response, if any.
pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response).into_iter().find_map(|raw| {
        let pair = raw.split(';').next()?;
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

/// `Cookie` request header carrying both session tokens.
pub fn cookie_header(access: &str, refresh: &str) -> String {
    format!("accessToken={access}; refreshToken={refresh}")
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user directly and return its id plus a signed-in cookie header.
///
/// Skips password hashing; use the HTTP endpoints when a test needs a real
/// password.
pub async fn seed_user(state: &AppState, first_name: &str, last_name: &str) -> (DbId, String) {
    let user = state
        .store
        .create_user(&CreateUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@test.com", first_name.to_lowercase()),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .expect("user creation should succeed");
    let pair = state.authenticator.issue(user.id).expect("tokens should mint");
    (user.id, cookie_header(&pair.access_token, &pair.refresh_token))
}

/// Insert a project directly.
pub async fn seed_project(
    state: &AppState,
    name: &str,
    manager_id: Option<DbId>,
    member_ids: Vec<DbId>,
) -> DbId {
    state
        .store
        .create_project(&CreateProject {
            name: name.to_string(),
            department: "general".to_string(),
            manager_id,
            member_ids,
        })
        .await
        .expect("project creation should succeed")
        .id
}

/// File a report over HTTP and return its id.
pub async fn file_report(app: &Router, cookie: &str, project_id: DbId, bug: &str) -> DbId {
    let response = post_json(
        app,
        "/api/v1/reports",
        serde_json::json!({
            "project_id": project_id,
            "bug": bug,
            "details": "Steps below",
            "severity": "MAJOR",
            "reproduce_steps": ["open the app", "click save"],
        }),
        Some(cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
