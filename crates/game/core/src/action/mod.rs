//! Player commands and their state transitions.
//!
//! [`Action`] is the closed set of in-turn commands a player can issue while
//! the game is in `playing`. [`PlayerAction`] pairs one with the caller and
//! enforces the checks shared by every action before dispatching to the
//! concrete transition in [`kinds`]. Lifecycle commands (deck selection,
//! setup, start, post-turn) live in [`lifecycle`].

mod error;
pub mod kinds;
pub mod lifecycle;
mod transition;

pub use error::ActionError;
pub(crate) use error::require_phase;
pub use kinds::{
    AbilityOutcome, AddToReinforcementsAction, AttackAction, AttackOutcome, DeployAction,
    DeployOutcome, EndTurnAction, MoveAction, MoveOutcome, QueueOutcome, UseAbilityAction,
};
pub use lifecycle::{
    CompletePostTurnCommand, PlaceGeneralCommand, SelectDeckCommand, SetupReinforcementsCommand,
    StartGameCommand, StartOutcome, TurnChange,
};
pub use transition::ActionTransition;

use crate::engine::economy::{self, ReinforcementSteps};
use crate::state::{GameState, Phase, PlayerId};

/// In-turn command. Serialized with a `type` tag (`{"type": "move", ...}`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum Action {
    Move(MoveAction),
    Attack(AttackAction),
    DeployFromReinforcements(DeployAction),
    AddToReinforcements(AddToReinforcementsAction),
    UseAbility(UseAbilityAction),
    EndTurn,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Attack(_) => "attack",
            Action::DeployFromReinforcements(_) => "deployFromReinforcements",
            Action::AddToReinforcements(_) => "addToReinforcements",
            Action::UseAbility(_) => "useAbility",
            Action::EndTurn => "endTurn",
        }
    }

    /// Every action except `endTurn` costs one action point.
    pub const fn is_chargeable(&self) -> bool {
        !matches!(self, Action::EndTurn)
    }
}

/// What a successful action did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum ActionResult {
    Moved(MoveOutcome),
    Attacked(AttackOutcome),
    Deployed(DeployOutcome),
    Queued(QueueOutcome),
    AbilityUsed(AbilityOutcome),
    TurnEnded { steps: ReinforcementSteps },
}

/// An [`Action`] issued by a specific player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAction {
    pub player: PlayerId,
    pub action: Action,
}

impl PlayerAction {
    pub fn new(player: PlayerId, action: Action) -> Self {
        Self { player, action }
    }
}

impl ActionTransition for PlayerAction {
    type Error = ActionError;
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::Playing)?;
        if self.player != state.current_player {
            return Err(ActionError::NotYourTurn {
                player: self.player,
                current: state.current_player,
            });
        }
        if self.action.is_chargeable() && state.player(self.player).action_points == 0 {
            return Err(ActionError::NoActionPoints);
        }

        match &self.action {
            Action::Move(action) => action.pre_validate(state),
            Action::Attack(action) => action.pre_validate(state),
            Action::DeployFromReinforcements(action) => action.pre_validate(state),
            Action::AddToReinforcements(action) => action.pre_validate(state),
            Action::UseAbility(action) => action.pre_validate(state),
            Action::EndTurn => EndTurnAction.pre_validate(state),
        }
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let result = match &self.action {
            Action::Move(action) => ActionResult::Moved(action.apply(state)?),
            Action::Attack(action) => ActionResult::Attacked(action.apply(state)?),
            Action::DeployFromReinforcements(action) => {
                ActionResult::Deployed(action.apply(state)?)
            }
            Action::AddToReinforcements(action) => ActionResult::Queued(action.apply(state)?),
            Action::UseAbility(action) => ActionResult::AbilityUsed(action.apply(state)?),
            Action::EndTurn => ActionResult::TurnEnded {
                steps: EndTurnAction.apply(state)?,
            },
        };

        if self.action.is_chargeable() {
            let player = state.player_mut(self.player);
            player.action_points = player.action_points.saturating_sub(1);
            state.actions_this_turn += 1;
            economy::settle_victory(state);
        }
        Ok(result)
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}
