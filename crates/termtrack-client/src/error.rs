//! Error types for the terminal client

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server unreachable after the bounded retry loop
    #[error("Could not connect to the server, please try again later")]
    Offline,

    /// The server rejected the request; `detail` is its own wording
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },

    /// Command needs a session and there is none
    #[error("You are not logged in. Use 'login' or 'register' first")]
    NotLoggedIn,

    /// Settings file read error
    #[error("Failed to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file parse error
    #[error("Failed to parse settings file {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// Invalid interactive input
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed response from the server
    #[error("Unexpected response from the server: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Create an invalid input error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
