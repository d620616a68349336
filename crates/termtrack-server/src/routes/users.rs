//! Account and session endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use termtrack_core::TermtrackError;
use termtrack_core::models::user::{Power, User};
use termtrack_core::repository::UserRepository;
use tracing::info;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub user: User,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// `POST /users/` — register a new account and open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = body.user.username.clone();
    let token = state
        .sessions
        .register(body.user, &body.password)
        .await
        .map_err(|err| match err {
            TermtrackError::AlreadyExists { .. } => {
                ApiError::not_acceptable("Username already taken")
            }
            other => ApiError::or_database(other, "Could not create user"),
        })?;

    info!(username = %username, "User registered");
    Ok(Json(json!({ "token": token })))
}

/// `POST /login/` — authenticate and open a fresh session, invalidating
/// any previous one.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let token = state.sessions.login(&body.username, &body.password).await?;

    info!(username = %body.username, "User logged in");
    Ok(Json(json!({ "token": token })))
}

/// `GET /users/{username}` — public profile.
pub async fn get_user(
    State(state): State<AppState>,
    _actor: Actor,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    let account = state.users.get(&username).await?;
    Ok(Json(account.profile()))
}

/// `GET /users/?search=<fragment>` — usernames containing the fragment.
pub async fn search(
    State(state): State<AppState>,
    _actor: Actor,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let usernames = state.users.search(&query.search).await?;
    Ok(Json(usernames))
}

/// `PUT /users/{username}` — update one's own profile. The username is
/// the record id and cannot change.
pub async fn update_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(username): Path<String>,
    Json(profile): Json<User>,
) -> Result<Json<Value>, ApiError> {
    if username != actor.username {
        return Err(ApiError::bad_request(
            "You cannot modify another user's account",
        ));
    }
    if profile.username != username {
        return Err(ApiError::unauthorized("You cannot change the username"));
    }

    state
        .users
        .update_profile(&profile)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update user"))?;

    info!(username = %username, "User profile updated");
    Ok(Json(json!({ "detail": "User updated successfully" })))
}

/// `DELETE /users/{username}` — delete one's own account. The body is
/// the password digest as a bare JSON string, re-checked before the
/// account is removed.
pub async fn delete_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(username): Path<String>,
    Json(password): Json<String>,
) -> Result<Json<Value>, ApiError> {
    if state.users.find(&username).await?.is_none() {
        return Err(ApiError::not_found("Could not find user"));
    }
    if username != actor.username {
        return Err(ApiError::unauthorized(
            "You cannot delete someone else's account",
        ));
    }
    if !state.sessions.verify_password(&actor, &password)? {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    state
        .users
        .delete(&username)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not delete user"))?;
    state.sessions.supersede(&username).await?;

    info!(username = %username, "User account deleted");
    Ok(Json(json!({ "detail": "User deleted successfully" })))
}

/// `POST /admin/{username}` — promote a user to admin. Admins only.
pub async fn promote(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !actor.is_admin() {
        return Err(ApiError::unauthorized("You are not an admin"));
    }

    state
        .users
        .set_power(&username, Power::Admin)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not promote user"))?;

    info!(username = %username, promoted_by = %actor.username, "User promoted to admin");
    Ok(Json(json!({ "detail": "User promoted to admin successfully" })))
}
