//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Users and projects are keyed by
//! their unique names, sessions by the hash of their bearer token.

use crate::error::TermtrackResult;
use crate::models::{
    project::Project,
    session::Session,
    user::{Power, User, UserAccount},
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, account: UserAccount) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn find(
        &self,
        username: &str,
    ) -> impl Future<Output = TermtrackResult<Option<UserAccount>>> + Send;
    /// Like [`UserRepository::find`] but failing with `NotFound`.
    fn get(&self, username: &str) -> impl Future<Output = TermtrackResult<UserAccount>> + Send;
    /// Replaces the mutable profile fields; the username never changes.
    fn update_profile(&self, profile: &User) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn set_power(
        &self,
        username: &str,
        power: Power,
    ) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn delete(&self, username: &str) -> impl Future<Output = TermtrackResult<()>> + Send;
    /// Usernames containing the given fragment.
    fn search(&self, fragment: &str) -> impl Future<Output = TermtrackResult<Vec<String>>> + Send;
    /// Records that `project` changed since `username` last polled.
    fn push_project_update(
        &self,
        username: &str,
        project: &str,
    ) -> impl Future<Output = TermtrackResult<()>> + Send;
    /// Drains and returns the pending project update notifications.
    fn take_project_updates(
        &self,
        username: &str,
    ) -> impl Future<Output = TermtrackResult<Vec<String>>> + Send;
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    fn create(&self, project: &Project) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn find(&self, name: &str) -> impl Future<Output = TermtrackResult<Option<Project>>> + Send;
    /// Like [`ProjectRepository::find`] but failing with `NotFound`.
    fn get(&self, name: &str) -> impl Future<Output = TermtrackResult<Project>> + Send;
    /// Replaces everything but the name and owner of an existing project.
    fn update(&self, project: &Project) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn delete(&self, name: &str) -> impl Future<Output = TermtrackResult<()>> + Send;
    /// All projects the user is a member of, oldest first.
    fn list_for_member(
        &self,
        username: &str,
    ) -> impl Future<Output = TermtrackResult<Vec<Project>>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: &Session) -> impl Future<Output = TermtrackResult<()>> + Send;
    fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = TermtrackResult<Option<Session>>> + Send;
    /// Invalidate a single session.
    fn delete_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = TermtrackResult<()>> + Send;
    /// Invalidate all sessions for a user, returning how many existed.
    fn delete_for_user(&self, username: &str) -> impl Future<Output = TermtrackResult<u64>> + Send;
}
