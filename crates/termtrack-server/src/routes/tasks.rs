//! Task endpoints: lifecycle, assignment, and completion.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use termtrack_auth::policy;
use termtrack_core::models::task::{Completion, Task};
use termtrack_core::repository::ProjectRepository;
use tracing::info;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompletionQuery {
    pub completion: String,
}

/// `POST /projects/{name}/tasks/` — add a task to a project.
pub async fn add_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(name): Path<String>,
    Json(task): Json<Task>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You are not authorized to add tasks to this project",
        ));
    }

    let task_name = task.name.clone();
    if !project.add_task(task) {
        return Err(ApiError::unauthorized("Task already exists"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, "Task added");
    Ok(Json(json!({ "detail": "Task added successfully" })))
}

/// `PUT /projects/{name}/tasks/{task}` — replace a task's fields. The
/// name itself is immutable.
pub async fn update_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, task_name)): Path<(String, String)>,
    Json(task): Json<Task>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot modify tasks within this project",
        ));
    }
    if task.name != task_name {
        return Err(ApiError::not_acceptable("Cannot modify task name"));
    }

    let stored = project
        .task_mut(&task_name)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    *stored = task;

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, "Task updated");
    Ok(Json(json!({ "detail": "Task updated successfully" })))
}

/// `DELETE /projects/{name}/tasks/{task}`.
pub async fn delete_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, task_name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot modify tasks within this project",
        ));
    }
    if !project.remove_tasks([task_name.as_str()]) {
        return Err(ApiError::not_found("Task not found"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, "Task deleted");
    Ok(Json(json!({ "detail": "Task deleted successfully" })))
}

/// `POST /projects/{name}/tasks/{task}/members/{username}` — assign a
/// project member to a task.
pub async fn assign_member(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, task_name, username)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot modify tasks within this project",
        ));
    }
    if !project.is_member(&username) {
        return Err(ApiError::bad_request(
            "User is not part of the project. Add them as a member of the project first!",
        ));
    }

    let task = project
        .task_mut(&task_name)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    if !task.add_members([username.as_str()]) {
        return Err(ApiError::bad_request("User is already part of the task"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, member = %username, "Member assigned to task");
    Ok(Json(json!({ "detail": "Member added to the task successfully" })))
}

/// `DELETE /projects/{name}/tasks/{task}/members/{username}`.
pub async fn unassign_member(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, task_name, username)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;
    if !policy::can_manage_membership(&actor, &project) {
        return Err(ApiError::forbidden(
            "You cannot modify tasks within this project",
        ));
    }

    let task = project
        .task_mut(&task_name)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    if !task.remove_members([username.as_str()]) {
        return Err(ApiError::not_found("User is not part of the task"));
    }

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, member = %username, "Member removed from task");
    Ok(Json(json!({ "detail": "User removed from task successfully" })))
}

/// `PUT /projects/{name}/tasks/{task}/completion?completion=<value>` —
/// set a task's completion. The value is a done flag for discrete tasks
/// or a reached-milestone count for milestone tasks; the assignees may
/// update it even without moderator rights.
pub async fn set_completion(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((name, task_name)): Path<(String, String)>,
    Query(query): Query<CompletionQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut project = state.projects.get(&name).await?;

    let task = project
        .task(&task_name)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    if !policy::can_modify_task_completion(&actor, &project, task) {
        return Err(ApiError::forbidden(
            "You cannot update this task's completion",
        ));
    }

    let completion: Completion = query.completion.parse()?;
    // Second lookup, this time mutable. The immutable borrow above ends
    // at the policy check.
    let task = project
        .task_mut(&task_name)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    task.set_completion(completion)?;

    state
        .projects
        .update(&project)
        .await
        .map_err(|err| ApiError::or_database(err, "Could not update project"))?;

    info!(project = %name, task = %task_name, by = %actor.username, "Task completion updated");
    Ok(Json(json!({ "detail": "Task completion updated successfully" })))
}
