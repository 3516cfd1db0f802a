use super::{own_active_piece, require_influence};
use crate::action::{ActionError, ActionTransition};
use crate::state::{Ability, GameState, PieceId};

/// Spends one charge of an active ability.
///
/// Only the charge bookkeeping is modelled; ability effects are left to
/// future rule sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UseAbilityAction {
    pub piece_id: PieceId,
    #[cfg_attr(feature = "serde", serde(rename = "abilityName"))]
    pub ability: Ability,
}

impl UseAbilityAction {
    pub fn new(piece_id: PieceId, ability: Ability) -> Self {
        Self { piece_id, ability }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AbilityOutcome {
    pub remaining: u8,
}

impl ActionTransition for UseAbilityAction {
    type Error = ActionError;
    type Result = AbilityOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let piece = own_active_piece(state, state.current_player, self.piece_id)?;
        require_influence(state, piece)?;

        match piece.ability_charges.get(&self.ability) {
            None => Err(ActionError::UnknownAbility {
                piece: self.piece_id,
                ability: self.ability,
            }),
            Some(0) => Err(ActionError::NoChargesLeft {
                piece: self.piece_id,
                ability: self.ability,
            }),
            Some(_) => Ok(()),
        }
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let piece = state
            .board
            .find_mut(self.piece_id)
            .ok_or(ActionError::PieceNotFound(self.piece_id))?;
        let charges = piece
            .ability_charges
            .get_mut(&self.ability)
            .ok_or(ActionError::UnknownAbility {
                piece: self.piece_id,
                ability: self.ability,
            })?;
        *charges = charges.saturating_sub(1);
        Ok(AbilityOutcome {
            remaining: *charges,
        })
    }
}
