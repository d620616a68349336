//! HTTP tests for the account endpoints, driving the real router.

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

/// Helper: in-memory database behind the full router.
async fn setup() -> (Router, Surreal<Any>) {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    termtrack_db::run_migrations(&db).await.unwrap();

    let app = build_router(AppState::new(db.clone(), AuthConfig::default()));
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

/// Helper: register a user and return their session token.
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
async fn register_returns_a_working_token() {
    let (app, _db) = setup().await;
    let token = register(&app, "ada").await;

    let (status, body) = send(&app, request("GET", "/", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "hello there ada!");
    assert_eq!(body["username"], "ada");
    assert_eq!(body["admin"], false);
}

#[tokio::test]
async fn register_rejects_taken_usernames() {
    let (app, _db) = setup().await;
    register(&app, "ada").await;

    let body = json!({
        "user": { "username": "ada", "full_name": "Someone Else" },
        "password": "other",
    });
    let (status, body) = send(&app, request("POST", "/users/", None, Some(body))).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["detail"], "Username already taken");
}

#[tokio::test]
async fn login_issues_tokens_and_rejects_bad_credentials() {
    let (app, _db) = setup().await;
    register(&app, "ada").await;

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
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/login/",
            None,
            Some(json!({ "username": "ada", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect username or password");

    // Unknown user reads exactly like a wrong password.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/login/",
            None,
            Some(json!({ "username": "nobody", "password": "digest" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn profiles_are_readable_by_any_authenticated_user() {
    let (app, _db) = setup().await;
    register(&app, "ada").await;
    let grace = register(&app, "grace").await;

    let (status, body) = send(&app, request("GET", "/users/ada", Some(&grace), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["full_name"], "ada example");
    assert_eq!(body["profile_picture"], Value::Null);

    let (status, body) = send(&app, request("GET", "/users/nobody", Some(&grace), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");

    let (status, _) = send(&app, request("GET", "/users/ada", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn search_returns_matching_usernames() {
    let (app, _db) = setup().await;
    let token = register(&app, "ada").await;
    register(&app, "adam").await;
    register(&app, "grace").await;

    let (status, body) = send(
        &app,
        request("GET", "/users/?search=ada", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["ada", "adam"]));
}

#[tokio::test]
async fn users_can_update_only_their_own_profile() {
    let (app, _db) = setup().await;
    let ada = register(&app, "ada").await;
    register(&app, "grace").await;

    let profile = json!({ "username": "ada", "full_name": "Ada Lovelace" });
    let (status, body) = send(
        &app,
        request("PUT", "/users/ada", Some(&ada), Some(profile)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "User updated successfully");

    let (_, body) = send(&app, request("GET", "/users/ada", Some(&ada), None)).await;
    assert_eq!(body["full_name"], "Ada Lovelace");

    // Someone else's account.
    let profile = json!({ "username": "grace", "full_name": "Grace" });
    let (status, body) = send(
        &app,
        request("PUT", "/users/grace", Some(&ada), Some(profile)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You cannot modify another user's account");

    // Renaming the account.
    let profile = json!({ "username": "countess", "full_name": "Ada Lovelace" });
    let (status, body) = send(
        &app,
        request("PUT", "/users/ada", Some(&ada), Some(profile)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "You cannot change the username");
}

#[tokio::test]
async fn account_deletion_requires_the_right_owner_and_password() {
    let (app, _db) = setup().await;
    let ada = register(&app, "ada").await;
    register(&app, "grace").await;

    let (status, body) = send(
        &app,
        request("DELETE", "/users/nobody", Some(&ada), Some(json!("digest"))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Could not find user");

    let (status, body) = send(
        &app,
        request("DELETE", "/users/grace", Some(&ada), Some(json!("digest"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "You cannot delete someone else's account");

    let (status, body) = send(
        &app,
        request("DELETE", "/users/ada", Some(&ada), Some(json!("wrong"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect password");

    let (status, body) = send(
        &app,
        request("DELETE", "/users/ada", Some(&ada), Some(json!("digest"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "User deleted successfully");

    // The session died with the account.
    let (status, _) = send(&app, request("GET", "/", Some(&ada), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn promotion_is_admin_only() {
    let (app, db) = setup().await;
    let ada = register(&app, "ada").await;
    register(&app, "grace").await;

    let (status, body) = send(&app, request("POST", "/admin/grace", Some(&ada), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "You are not an admin");

    // Bootstrap the first admin directly in the store.
    let users = SurrealUserRepository::new(db);
    users.set_power("ada", Power::Admin).await.unwrap();

    let (status, body) = send(&app, request("POST", "/admin/grace", Some(&ada), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "User promoted to admin successfully");

    let (status, body) = send(&app, request("POST", "/admin/nobody", Some(&ada), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}
