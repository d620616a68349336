//! SurrealDB implementation of [`UserRepository`].
//!
//! Users are keyed by their username (`user:⟨name⟩`), so the storage
//! engine itself enforces uniqueness at creation time.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use termtrack_core::error::TermtrackResult;
use termtrack_core::models::user::{Power, User, UserAccount};
use termtrack_core::repository::UserRepository;

use crate::error::DbError;

/// DB-side row struct mirroring the `user` table.
#[derive(Debug, SurrealValue)]
struct UserRow {
    username: String,
    full_name: String,
    profile_picture: Option<String>,
    password_hash: String,
    power: String,
    update_projects: Vec<String>,
    update_messages: Vec<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_account(self) -> Result<UserAccount, DbError> {
        let power = Power::from_str(&self.power).map_err(|e| DbError::Query(e.to_string()))?;
        Ok(UserAccount {
            username: self.username,
            full_name: self.full_name,
            profile_picture: self.profile_picture,
            password_hash: self.password_hash,
            power,
            update_projects: self.update_projects,
            update_messages: self.update_messages,
        })
    }
}

/// Row struct for username-only projections.
#[derive(Debug, SurrealValue)]
struct UsernameRow {
    username: String,
}

/// Row struct for draining pending update notifications.
#[derive(Debug, SurrealValue)]
struct UpdatesRow {
    update_projects: Vec<String>,
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, account: UserAccount) -> TermtrackResult<()> {
        let result = self
            .db
            .query(
                "CREATE type::record('user', $username) SET \
                 username = $username, \
                 full_name = $full_name, \
                 profile_picture = $profile_picture, \
                 password_hash = $password_hash, \
                 power = $power, \
                 update_projects = $update_projects, \
                 update_messages = $update_messages",
            )
            .bind(("username", account.username))
            .bind(("full_name", account.full_name))
            .bind(("profile_picture", account.profile_picture))
            .bind(("password_hash", account.password_hash))
            .bind(("power", account.power.as_str().to_string()))
            .bind(("update_projects", account.update_projects))
            .bind(("update_messages", account.update_messages))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find(&self, username: &str) -> TermtrackResult<Option<UserAccount>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $username)")
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_account().map_err(DbError::from)?)),
            None => Ok(None),
        }
    }

    async fn get(&self, username: &str) -> TermtrackResult<UserAccount> {
        self.find(username)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "User".into(),
                id: username.to_string(),
            })
            .map_err(Into::into)
    }

    async fn update_profile(&self, profile: &User) -> TermtrackResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $username) SET \
                 full_name = $full_name, \
                 profile_picture = $profile_picture, \
                 updated_at = time::now()",
            )
            .bind(("username", profile.username.clone()))
            .bind(("full_name", profile.full_name.clone()))
            .bind(("profile_picture", profile.profile_picture.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "User".into(),
                id: profile.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    async fn set_power(&self, username: &str, power: Power) -> TermtrackResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $username) SET \
                 power = $power, updated_at = time::now()",
            )
            .bind(("username", username.to_string()))
            .bind(("power", power.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "User".into(),
                id: username.to_string(),
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, username: &str) -> TermtrackResult<()> {
        self.db
            .query("DELETE type::record('user', $username)")
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn search(&self, fragment: &str) -> TermtrackResult<Vec<String>> {
        let mut result = self
            .db
            .query(
                "SELECT username FROM user \
                 WHERE string::contains(username, $fragment) \
                 ORDER BY username ASC",
            )
            .bind(("fragment", fragment.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UsernameRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|row| row.username).collect())
    }

    async fn push_project_update(&self, username: &str, project: &str) -> TermtrackResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $username) SET \
                 update_projects = array::union(update_projects, [$project]), \
                 updated_at = time::now()",
            )
            .bind(("username", username.to_string()))
            .bind(("project", project.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "User".into(),
                id: username.to_string(),
            }
            .into());
        }

        Ok(())
    }

    async fn take_project_updates(&self, username: &str) -> TermtrackResult<Vec<String>> {
        // Read and clear in a single round trip; both statements run in
        // order within the same request.
        let result = self
            .db
            .query(
                "SELECT update_projects FROM type::record('user', $username); \
                 UPDATE type::record('user', $username) SET \
                 update_projects = [], updated_at = time::now();",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UpdatesRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "User".into(),
            id: username.to_string(),
        })?;

        Ok(row.update_projects)
    }
}
