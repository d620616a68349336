//! Shared application state.

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use termtrack_auth::{AuthConfig, SessionService};
use termtrack_db::{SurrealProjectRepository, SurrealSessionRepository, SurrealUserRepository};

/// State handed to every request handler.
///
/// All members are cheap handles over the same database connection, so
/// cloning the state per request is fine.
#[derive(Clone)]
pub struct AppState {
    pub users: SurrealUserRepository<Any>,
    pub projects: SurrealProjectRepository<Any>,
    pub sessions: SessionService<SurrealUserRepository<Any>, SurrealSessionRepository<Any>>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth: AuthConfig) -> Self {
        let users = SurrealUserRepository::new(db.clone());
        let sessions = SessionService::new(
            users.clone(),
            SurrealSessionRepository::new(db.clone()),
            auth,
        );

        Self {
            users,
            projects: SurrealProjectRepository::new(db),
            sessions,
        }
    }
}
