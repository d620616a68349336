//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use termtrack_core::models::user::UserAccount;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the session token on authenticated routes.
pub const TOKEN_HEADER: &str = "token-uuid";

/// The authenticated caller.
///
/// Resolving the extractor validates the `token-uuid` header against
/// the session store, so a handler taking an `Actor` can assume the
/// request is authenticated.
pub struct Actor(pub UserAccount);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let account = state.sessions.authenticate(token).await?;
        Ok(Actor(account))
    }
}
