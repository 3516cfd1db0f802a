//! Command execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! command runs pre_validate → apply → post_validate; when any stage fails the
//! state is restored to its pre-command snapshot, so a rejected command never
//! leaves a partial mutation behind.

pub mod economy;
mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{ActionResult, StartOutcome, TurnChange};
use crate::command::Command;
use crate::state::{GameState, Phase, PieceId, PlayerId};

/// Command-specific result.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum CommandResult {
    DeckSelected { setup_started: bool },
    GeneralPlaced { general: PieceId },
    ReinforcementsConfigured,
    GameStarted(StartOutcome),
    Action(ActionResult),
    TurnPassed(TurnChange),
}

/// Complete outcome of command execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub result: CommandResult,
    pub phase_before: Phase,
    pub phase_after: Phase,
    /// Set when this command ended the game.
    pub winner: Option<PlayerId>,
}

impl ExecutionOutcome {
    pub fn phase_changed(&self) -> bool {
        self.phase_before != self.phase_after
    }
}

/// Game engine that validates and applies commands against one game.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes a command by routing it through the transition pipeline.
    pub fn execute(&mut self, command: &Command) -> Result<ExecutionOutcome, ExecuteError> {
        let before = self.state.clone();

        match transition::execute_transition(command, self.state) {
            Ok(result) => {
                let winner = if before.is_finished() {
                    None
                } else {
                    self.state.winner
                };
                Ok(ExecutionOutcome {
                    result,
                    phase_before: before.phase,
                    phase_after: self.state.phase,
                    winner,
                })
            }
            Err(error) => {
                *self.state = before;
                Err(error)
            }
        }
    }
}
