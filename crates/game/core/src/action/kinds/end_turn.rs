use crate::action::{ActionError, ActionTransition};
use crate::engine::economy::{self, ReinforcementSteps};
use crate::state::{GameState, Phase};

/// Closes the acting half of the turn and opens the post-turn window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndTurnAction;

impl ActionTransition for EndTurnAction {
    type Error = ActionError;
    type Result = ReinforcementSteps;

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        state.phase = Phase::PostTurn;
        let player = state.current_player;
        economy::advance_reinforcements(state, player)
    }
}
