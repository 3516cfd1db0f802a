//! Command dispatch and execution logic.

use crate::action::{ActionTransition, StartGameCommand};
use crate::command::Command;
use crate::state::GameState;

use super::CommandResult;
use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each command to its transition and wraps the result in [`CommandResult`].
pub(super) fn execute_transition(
    command: &Command,
    state: &mut GameState,
) -> Result<CommandResult, ExecuteError> {
    match command {
        Command::SelectDeck(transition) => {
            let setup_started =
                drive_transition(transition, state).map_err(ExecuteError::SelectDeck)?;
            Ok(CommandResult::DeckSelected { setup_started })
        }
        Command::PlaceGeneral(transition) => {
            let general =
                drive_transition(transition, state).map_err(ExecuteError::PlaceGeneral)?;
            Ok(CommandResult::GeneralPlaced { general })
        }
        Command::SetupReinforcements(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::SetupReinforcements)?;
            Ok(CommandResult::ReinforcementsConfigured)
        }
        Command::StartGame => {
            let outcome =
                drive_transition(&StartGameCommand, state).map_err(ExecuteError::StartGame)?;
            Ok(CommandResult::GameStarted(outcome))
        }
        Command::Play(transition) => {
            let result = drive_transition(transition, state).map_err(|error| {
                ExecuteError::Action {
                    action: transition.action.as_str(),
                    error,
                }
            })?;
            Ok(CommandResult::Action(result))
        }
        Command::CompletePostTurn(transition) => {
            let change =
                drive_transition(transition, state).map_err(ExecuteError::CompletePostTurn)?;
            Ok(CommandResult::TurnPassed(change))
        }
    }
}
