//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;

impl From<DbError> for washbay_core::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => washbay_core::Error::NotFound(msg),
            // The only unique constraint this crate surfaces is the
            // tenant-scoped token on jobs.
            DbError::Duplicate(msg) => washbay_core::Error::DuplicateToken(msg),
            other => washbay_core::Error::Storage(other.to_string()),
        }
    }
}
