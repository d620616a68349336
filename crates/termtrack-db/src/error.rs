//! Database-specific error types and conversions.

use termtrack_core::error::TermtrackError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for TermtrackError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TermtrackError::NotFound { entity, id },
            other => TermtrackError::Database(other.to_string()),
        }
    }
}
