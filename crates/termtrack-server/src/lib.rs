//! termtrack HTTP API.
//!
//! Exposes the project and task tracking surface over HTTP/JSON. Every
//! authenticated route reads the session token from the `token-uuid`
//! header; error bodies are always `{"detail": "..."}`.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
