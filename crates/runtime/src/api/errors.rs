//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, request validation failures, repository errors
//! and worker coordination failures. [`RuntimeError::class`] folds them into
//! the coarse classes transports report to clients.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use vanguard_core::{ErrorKind, ErrorSeverity, ExecuteError, GameError, GameId, PieceId};

use super::request::ValidationErrors;
pub use crate::repository::RepositoryError;
use crate::repository::ActionId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("action {action_id} not found in game {game_id}")]
    ActionNotFound { game_id: GameId, action_id: ActionId },

    #[error("turn {turn_number} not found in game {game_id}")]
    TurnNotFound { game_id: GameId, turn_number: u32 },

    #[error("piece {piece_id} is not on the board of game {game_id}")]
    PieceNotFound { game_id: GameId, piece_id: PieceId },

    #[error(transparent)]
    Rejected(#[from] ExecuteError),

    #[error(transparent)]
    InvalidRequest(#[from] ValidationErrors),

    #[error("game {0} has too many pending commands")]
    GameBusy(GameId),

    #[error("game worker command channel closed")]
    CommandChannelClosed,

    #[error("game worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RuntimeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => RuntimeError::GameNotFound(id),
            other => RuntimeError::Repository(other),
        }
    }
}

/// Coarse error classes reported to clients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::NotFound => "not_found",
            ErrorClass::Conflict => "conflict",
            ErrorClass::Internal => "internal",
        }
    }
}

impl From<ErrorKind> for ErrorClass {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorClass::NotFound,
            ErrorKind::InvalidPhase | ErrorKind::NotYourTurn => ErrorClass::Conflict,
            ErrorKind::OutOfResource | ErrorKind::IllegalTarget | ErrorKind::MalformedCommand => {
                ErrorClass::BadRequest
            }
            ErrorKind::Internal => ErrorClass::Internal,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuntimeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            // Retryable: the game is fine, its mailbox is just full.
            RuntimeError::GameBusy(_) => ErrorClass::Conflict,
            _ => self.kind().into(),
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Rejected(err) => err.severity(),
            RuntimeError::InvalidRequest(_) => ErrorSeverity::Validation,
            RuntimeError::GameNotFound(_)
            | RuntimeError::ActionNotFound { .. }
            | RuntimeError::TurnNotFound { .. }
            | RuntimeError::PieceNotFound { .. }
            | RuntimeError::GameBusy(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Internal,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Rejected(err) => err.kind(),
            RuntimeError::InvalidRequest(_) => ErrorKind::MalformedCommand,
            RuntimeError::GameNotFound(_)
            | RuntimeError::ActionNotFound { .. }
            | RuntimeError::TurnNotFound { .. }
            | RuntimeError::PieceNotFound { .. } => ErrorKind::NotFound,
            RuntimeError::GameBusy(_) => ErrorKind::OutOfResource,
            _ => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Rejected(err) => err.error_code(),
            RuntimeError::InvalidRequest(_) => "REQUEST_INVALID",
            RuntimeError::GameNotFound(_) => "GAME_NOT_FOUND",
            RuntimeError::ActionNotFound { .. } => "ACTION_RECORD_NOT_FOUND",
            RuntimeError::TurnNotFound { .. } => "TURN_NOT_FOUND",
            RuntimeError::PieceNotFound { .. } => "PIECE_NOT_FOUND",
            RuntimeError::GameBusy(_) => "GAME_BUSY",
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::Repository(_) => "RUNTIME_REPOSITORY",
        }
    }
}
