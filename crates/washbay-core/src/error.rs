//! Error types for WashBay.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("duplicate token: {0}")]
    DuplicateToken(String),

    #[error("retries exhausted: {0}")]
    Exhausted(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
