//! Project endpoints: lifecycle, membership, and moderators.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};
use termtrack_auth::policy;
use termtrack_core::TermtrackError;
use termtrack_core::models::project::Project;
use termtrack_core::repository::{ProjectRepository, UserRepository};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update requests carry the (unchangeable) name plus the description,
/// the only field editable through this route.
#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `POST /projects/` — create a project owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<CreateProjectRequest>,
) -> Result<Json<Value>, ApiError> {
    if state.projects.find(&body.name).await?.is_some() {
        return Err(ApiError::forbidden("Project already exists"));
    }

    let project = Project::new(body.name, body.description, actor.username.clone());
    state
        .projects
        .create(&project)
        .await
        .map_err(|err| match err {
            TermtrackError::AlreadyExists { .. } => ApiError::forbidden("Project already exists"),
            other => ApiError::or_database(other, "Could not create project"),
        })?;

    info!(project = %project.name, owner = %actor.username, "Project created");
    Ok(Json(json!({ "detail": "Project created successfully" })))
}

/// `GET /projects/{name}` — full project state, members only.
pub async fn get_project(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(name): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = state.projects.get(&name).await?;
    if !policy::can_view_project(&actor, &project) {
        return Err(ApiError::forbidden("You are not a member of this project"));
    }

    Ok(Json(project))
}

/// `GET /projects/all/` — progress percentage for every project the
/// caller belongs to.
pub async fn list_all(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<BTreeMap<String, u32>>, ApiError> {
    let projects = state.projects.list_for_member(&actor.username).await?;
    let progress = projects
        .into_iter()
        .map(|project| {
            let percent = project.progress();
            (project.name, percent)
        })
        .collect();

    Ok(Json(progress))
}

/// `PUT /projects/{name}` — update the description and queue a pending
/// update for every other member.
pub async fn update_project(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(name): Path<String>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_modify_project(&actor, &project) {
        return Err(ApiError::forbidden("You cannot modify this project"));
    }
    if body.name != project.name {
        return Err(ApiError::bad_request("Cannot modify project name"));
    }

    project.description = body.description;
    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    notify_members(&state, &project, &actor.username).await;

    info!(project = %project.name, by = %actor.username, "Project updated");
    Ok(Json(json!({ "detail": "Project updated successfully" })))
}

/// `DELETE /projects/{name}` — owner or admin only.
pub async fn delete_project(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let project = state.projects.get(&name).await?;
    if !policy::can_modify_project(&actor, &project) {
        return Err(ApiError::forbidden("You cannot delete this project"));
    }

    state
        .projects
        .delete(&name)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not delete project"))?;

    info!(project = %name, by = %actor.username, "Project deleted");
    Ok(Json(json!({ "detail": "Project deleted successfully" })))
}

/// `POST /projects/{name}/members/{username}`.
pub async fn add_member(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, username)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden("You cannot add members to this project"));
    }
    if state.users.find(&username).await?.is_none() {
        return Err(ApiError::not_found("User does not exist"));
    }
    if !project.add_members([username.as_str()]) {
        return Err(ApiError::bad_request("User already part of project"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, member = %username, "Member added to project");
    Ok(Json(json!({ "detail": "User added to project successfully" })))
}

/// `DELETE /projects/{name}/members/{username}`.
pub async fn remove_member(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, username)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot remove members from this project",
        ));
    }
    if !project.remove_members([username.as_str()]) {
        return Err(ApiError::not_found("User is not part of the project"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, member = %username, "Member removed from project");
    Ok(Json(json!({ "detail": "User removed from project successfully" })))
}

/// `POST /projects/{name}/moderators/{username}` — promote an existing
/// member to moderator. Owner or admin only.
pub async fn add_moderator(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, username)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_moderators(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot manage moderators of this project",
        ));
    }
    if !project.is_member(&username) {
        return Err(ApiError::bad_request("User is not part of the project"));
    }
    if !project.add_moderators([username.as_str()]) {
        return Err(ApiError::bad_request("User is already a moderator"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, moderator = %username, "Moderator added");
    Ok(Json(json!({ "detail": "Moderator added successfully" })))
}

/// `DELETE /projects/{name}/moderators/{username}`.
pub async fn remove_moderator(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, username)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_moderators(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot manage moderators of this project",
        ));
    }
    if !project.remove_moderators([username.as_str()]) {
        return Err(ApiError::not_found(
            "User is not a moderator of this project",
        ));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, moderator = %username, "Moderator demoted");
    Ok(Json(json!({ "detail": "User demoted successfully" })))
}

/// Pushes the project name into every other member's pending-update
/// set. Best effort: a failed push is logged and the request still
/// succeeds.
async fn notify_members(state: &AppState, project: &Project, actor: &str) {
    for member in project.members.iter().filter(|m| m.as_str() != actor) {
        if let Err(err) = state
            .users
            .push_project_update(member, &project.name)
            .await
        {
            warn!(
                member = %member,
                project = %project.name,
                error = %err,
                "Could not record project update"
            );
        }
    }
}
