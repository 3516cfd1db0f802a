//! Error types for the command execution pipeline.

use crate::action::{
    ActionError, ActionTransition, CompletePostTurnCommand, PlaceGeneralCommand, PlayerAction,
    SelectDeckCommand, SetupReinforcementsCommand, StartGameCommand,
};
use crate::error::{ErrorKind, ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing a command through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("select deck failed: {0}")]
    SelectDeck(TransitionPhaseError<<SelectDeckCommand as ActionTransition>::Error>),

    #[error("place general failed: {0}")]
    PlaceGeneral(TransitionPhaseError<<PlaceGeneralCommand as ActionTransition>::Error>),

    #[error("setup reinforcements failed: {0}")]
    SetupReinforcements(
        TransitionPhaseError<<SetupReinforcementsCommand as ActionTransition>::Error>,
    ),

    #[error("start game failed: {0}")]
    StartGame(TransitionPhaseError<<StartGameCommand as ActionTransition>::Error>),

    #[error("{action} action failed: {error}")]
    Action {
        action: &'static str,
        error: TransitionPhaseError<<PlayerAction as ActionTransition>::Error>,
    },

    #[error("complete post turn failed: {0}")]
    CompletePostTurn(TransitionPhaseError<<CompletePostTurnCommand as ActionTransition>::Error>),
}

impl ExecuteError {
    fn phase_error(&self) -> &TransitionPhaseError<ActionError> {
        match self {
            ExecuteError::SelectDeck(err)
            | ExecuteError::PlaceGeneral(err)
            | ExecuteError::SetupReinforcements(err)
            | ExecuteError::StartGame(err)
            | ExecuteError::CompletePostTurn(err) => err,
            ExecuteError::Action { error, .. } => error,
        }
    }

    /// The rule violation behind this failure.
    pub fn cause(&self) -> &ActionError {
        &self.phase_error().error
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase_error().phase
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.cause().severity()
    }

    fn kind(&self) -> ErrorKind {
        self.cause().kind()
    }

    fn error_code(&self) -> &'static str {
        self.cause().error_code()
    }
}
