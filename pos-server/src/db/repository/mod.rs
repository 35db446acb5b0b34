//! Repository Module
//!
//! Free query functions over the SQLite pool, grouped per table. Read paths
//! take any executor so the same function serves both pool reads and
//! transactional reads; multi-statement writes take `&mut SqliteConnection`
//! and run inside a caller-owned transaction.

pub mod analytics;
pub mod customer;
pub mod dish;
pub mod ingredient;
pub mod order;
pub mod table;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a sqlx error to [`RepoError::Duplicate`] when it is a UNIQUE
/// constraint violation, passing everything else through.
pub(crate) fn map_unique(err: sqlx::Error, msg: impl Into<String>) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate(msg.into()),
        _ => err.into(),
    }
}
