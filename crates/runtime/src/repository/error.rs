//! Error types raised by repository implementations.

use thiserror::Error;

use vanguard_core::GameId;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("game repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("game {0} already exists")]
    AlreadyExists(GameId),

    #[error("game {0} not found")]
    NotFound(GameId),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
