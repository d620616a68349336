//! HTTP tests for the session lifecycle: token validation, superseding
//! logins, and lazy expiry.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use termtrack_auth::AuthConfig;
use termtrack_core::models::user::Power;
use termtrack_core::repository::UserRepository;
use termtrack_db::SurrealUserRepository;
use termtrack_server::{AppState, build_router};
use tower::ServiceExt;

async fn setup_with(config: AuthConfig) -> (Router, Surreal<Any>) {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    termtrack_db::run_migrations(&db).await.unwrap();

    let app = build_router(AppState::new(db.clone(), config));
    (app, db)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("token-uuid", token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn register(app: &Router, username: &str) -> String {
    let body = json!({
        "user": { "username": username, "full_name": format!("{username} example") },
        "password": "digest",
    });
    let (status, body) = send(app, request("POST", "/users/", None, Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_a_valid_token_are_rejected() {
    let (app, _db) = setup_with(AuthConfig::default()).await;

    let (status, body) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Not authenticated");

    let (status, body) = send(&app, request("GET", "/", Some("garbage"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid session token");
}

#[tokio::test]
async fn a_new_login_supersedes_the_previous_session() {
    let (app, _db) = setup_with(AuthConfig::default()).await;
    let first = register(&app, "ada").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/login/",
            None,
            Some(json!({ "username": "ada", "password": "digest" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, request("GET", "/", Some(&first), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/", Some(&second), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn expired_sessions_fail_and_are_removed_on_first_sight() {
    let config = AuthConfig {
        session_lifetime_secs: 0,
        ..AuthConfig::default()
    };
    let (app, _db) = setup_with(config).await;
    let token = register(&app, "ada").await;

    let (status, body) = send(&app, request("GET", "/", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Session token has expired");

    // The expired row is gone, so the second attempt reads as unknown.
    let (status, body) = send(&app, request("GET", "/", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid session token");
}

#[tokio::test]
async fn hello_reports_the_admin_flag() {
    let (app, db) = setup_with(AuthConfig::default()).await;
    let token = register(&app, "ada").await;

    let (_, body) = send(&app, request("GET", "/", Some(&token), None)).await;
    assert_eq!(body["admin"], false);

    let users = SurrealUserRepository::new(db);
    users.set_power("ada", Power::Admin).await.unwrap();

    let (_, body) = send(&app, request("GET", "/", Some(&token), None)).await;
    assert_eq!(body["admin"], true);
    assert_eq!(body["response"], "hello there ada!");
}
