//! Authentication error types.

use termtrack_core::error::TermtrackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Invalid session token")]
    TokenInvalid,

    #[error("Session token has expired")]
    TokenExpired,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for TermtrackError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::TokenInvalid | AuthError::TokenExpired => {
                TermtrackError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => TermtrackError::Internal(msg),
        }
    }
}
