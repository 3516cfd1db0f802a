//! Deterministic rules engine for Vanguard, a two-player hidden-information
//! tactics game on an 8x8 board.
//!
//! `vanguard-core` defines the canonical rules (commands, engine, game state,
//! zone geometry) and exposes pure APIs: no I/O, no clocks, no randomness.
//! All state mutation flows through [`engine::GameEngine`], and supporting
//! crates depend on the types re-exported here.
pub mod action;
pub mod catalog;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{
    Action, ActionError, ActionResult, ActionTransition, AddToReinforcementsAction, AttackAction,
    CompletePostTurnCommand, DeployAction, MoveAction, PlaceGeneralCommand, PlayerAction,
    SelectDeckCommand, SetupReinforcementsCommand, StartGameCommand, UseAbilityAction,
};
pub use command::Command;
pub use config::GameConfig;
pub use engine::{
    CommandResult, ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase,
    TransitionPhaseError,
};
pub use error::{ErrorKind, ErrorSeverity, GameError};
pub use geometry::Zone;
pub use state::{
    Ability, BoardPiece, GameId, GameState, Phase, PieceId, PieceKind, PlayerId, PlayerState,
    Position, ReinforcementPiece, ReservePiece, Role, StateError,
};
