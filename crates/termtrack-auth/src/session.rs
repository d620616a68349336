//! Session service — registration, login and token authentication.

use chrono::{Duration, Utc};
use termtrack_core::error::{TermtrackError, TermtrackResult};
use termtrack_core::models::session::Session;
use termtrack_core::models::user::{User, UserAccount};
use termtrack_core::repository::{SessionRepository, UserRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Session service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
#[derive(Clone)]
pub struct SessionService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> SessionService<U, S> {
    pub fn new(users: U, sessions: S, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Create an account and log it straight in.
    pub async fn register(&self, profile: User, password: &str) -> TermtrackResult<String> {
        // 1. The username must be free.
        if self.users.find(&profile.username).await?.is_some() {
            return Err(TermtrackError::AlreadyExists {
                entity: "User".into(),
            });
        }

        // 2. Hash the password and store the account.
        let password_hash = password::hash_password(password, self.config.pepper.as_deref())?;
        let username = profile.username.clone();
        self.users
            .create(UserAccount::new(profile, password_hash))
            .await?;

        // 3. Issue the first session token.
        self.issue(&username).await
    }

    /// Authenticate with username + password and issue a fresh token.
    pub async fn login(&self, username: &str, password: &str) -> TermtrackResult<String> {
        // 1. Look up the account. Unknown users get the same error as
        //    wrong passwords.
        let account = self
            .users
            .find(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. Verify the password.
        if !self.verify_password(&account, password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Supersede any previous session, then issue a new token.
        self.supersede(username).await?;
        self.issue(username).await
    }

    /// Remove every live session for the user, returning how many there
    /// were. Called on login and when an account is deleted.
    pub async fn supersede(&self, username: &str) -> TermtrackResult<u64> {
        self.sessions.delete_for_user(username).await
    }

    /// Resolve a raw bearer token to the account it belongs to.
    ///
    /// Expired sessions are removed when first seen rather than by a
    /// background sweeper.
    pub async fn authenticate(&self, raw_token: &str) -> TermtrackResult<UserAccount> {
        // 1. Look up the session by token hash.
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        // 2. Check expiry lazily; drop the dead session and reject.
        if session.is_expired() {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Err(AuthError::TokenExpired.into());
        }

        // 3. Resolve the account. A session whose user is gone is
        //    stale; drop it and reject.
        match self.users.find(&session.username).await? {
            Some(account) => Ok(account),
            None => {
                self.sessions.delete_by_token_hash(&token_hash).await?;
                Err(AuthError::TokenInvalid.into())
            }
        }
    }

    /// Whether the token belongs to an admin. Any failure, including an
    /// invalid or expired token, answers `false`.
    pub async fn is_admin(&self, raw_token: &str) -> bool {
        self.authenticate(raw_token)
            .await
            .map(|account| account.is_admin())
            .unwrap_or(false)
    }

    /// Verify a password against a stored account, applying the
    /// configured pepper.
    pub fn verify_password(&self, account: &UserAccount, password: &str) -> TermtrackResult<bool> {
        Ok(password::verify_password(
            password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )?)
    }

    async fn issue(&self, username: &str) -> TermtrackResult<String> {
        let raw = token::generate_session_token();
        let session = Session {
            username: username.to_string(),
            token_hash: token::hash_session_token(&raw),
            expires_at: Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64),
        };
        self.sessions.insert(&session).await?;
        Ok(raw)
    }
}
