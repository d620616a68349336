//! termtrack database layer — SurrealDB connection management, schema
//! migrations and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - SurrealDB-backed implementations of the `termtrack-core`
//!   repository traits

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::{SurrealProjectRepository, SurrealSessionRepository, SurrealUserRepository};
pub use schema::{run_migrations, schema_v1};
