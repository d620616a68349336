//! Pending-update polling endpoint.

use axum::Json;
use axum::extract::State;
use termtrack_core::repository::UserRepository;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

/// `GET /update/projects` — names of projects changed since the caller
/// last polled. Reading clears the pending set.
pub async fn pending_projects(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<Vec<String>>, ApiError> {
    let projects = state.users.take_project_updates(&actor.username).await?;
    Ok(Json(projects))
}
