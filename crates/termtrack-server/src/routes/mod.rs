//! Route handlers and router assembly.

mod hello;
mod projects;
mod tasks;
mod updates;
mod users;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::AppState;

/// Assembles the full API router over the shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello::hello))
        .route("/users/", post(users::register).get(users::search))
        .route("/login/", post(users::login))
        .route(
            "/users/{username}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/admin/{username}", post(users::promote))
        .route("/projects/", post(projects::create))
        .route("/projects/all/", get(projects::list_all))
        .route(
            "/projects/{name}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/projects/{name}/members/{username}",
            post(projects::add_member).delete(projects::remove_member),
        )
        .route(
            "/projects/{name}/moderators/{username}",
            post(projects::add_moderator).delete(projects::remove_moderator),
        )
        .route("/projects/{name}/tasks/", post(tasks::add_task))
        .route(
            "/projects/{name}/tasks/{task}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route(
            "/projects/{name}/tasks/{task}/completion",
            put(tasks::set_completion),
        )
        .route(
            "/projects/{name}/tasks/{task}/members/{username}",
            post(tasks::assign_member).delete(tasks::unassign_member),
        )
        .route("/update/projects", get(updates::pending_projects))
        .with_state(state)
}
