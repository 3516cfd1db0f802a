//! State management errors.
//!
//! Raised by board bookkeeping and by [`GameState::check_invariants`](super::GameState::check_invariants).
//! Any of these reaching a caller means the engine produced an inconsistent
//! snapshot.

use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::state::{PieceId, PlayerId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("piece id allocation overflow (current: {current})")]
    PieceIdOverflow { current: u32 },

    #[error("position {position} is out of bounds")]
    PositionOutOfBounds { position: Position },

    #[error("position {position} is already occupied by piece {occupant}")]
    PositionOccupied { position: Position, occupant: PieceId },

    #[error("no piece at {position}")]
    EmptyCell { position: Position },

    #[error("piece {piece} stored at {cell} believes it is at {recorded}")]
    OccupancyDesync {
        piece: PieceId,
        cell: Position,
        recorded: Position,
    },

    #[error("piece {piece} appears in more than one location")]
    DuplicatePiece { piece: PieceId },

    #[error("piece {piece} in the reinforcement column is not queued by {owner}")]
    UnqueuedReinforcement { piece: PieceId, owner: PlayerId },

    #[error("queue of {player} is misnumbered at index {index}")]
    QueueNumbering { player: PlayerId, index: usize },

    #[error("queue of {player} reveals the wrong entries")]
    QueueVisibility { player: PlayerId },

    #[error("{player} owns {count} generals")]
    GeneralCount { player: PlayerId, count: usize },

    #[error("general {piece} of {player} sits in the reinforcement queue")]
    QueuedGeneral { player: PlayerId, piece: PieceId },

    #[error("{player} accounts for {actual} pieces, expected {expected}")]
    PieceConservation {
        player: PlayerId,
        expected: usize,
        actual: usize,
    },

    #[error("reinforcement column of {player} produced more than {capacity} steps")]
    StepOverflow { player: PlayerId, capacity: usize },

    #[error("phase and winner disagree")]
    WinnerMismatch,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            PieceIdOverflow { .. } => "STATE_PIECE_ID_OVERFLOW",
            PositionOutOfBounds { .. } => "STATE_POSITION_OUT_OF_BOUNDS",
            PositionOccupied { .. } => "STATE_POSITION_OCCUPIED",
            EmptyCell { .. } => "STATE_EMPTY_CELL",
            OccupancyDesync { .. } => "STATE_OCCUPANCY_DESYNC",
            DuplicatePiece { .. } => "STATE_DUPLICATE_PIECE",
            UnqueuedReinforcement { .. } => "STATE_UNQUEUED_REINFORCEMENT",
            QueueNumbering { .. } => "STATE_QUEUE_NUMBERING",
            QueueVisibility { .. } => "STATE_QUEUE_VISIBILITY",
            GeneralCount { .. } => "STATE_GENERAL_COUNT",
            QueuedGeneral { .. } => "STATE_QUEUED_GENERAL",
            PieceConservation { .. } => "STATE_PIECE_CONSERVATION",
            StepOverflow { .. } => "STATE_STEP_OVERFLOW",
            WinnerMismatch => "STATE_WINNER_MISMATCH",
        }
    }
}
