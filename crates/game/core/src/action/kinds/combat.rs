use super::{own_active_piece, require_influence};
use crate::action::{ActionError, ActionTransition};
use crate::geometry;
use crate::state::{GameState, PieceId, PieceKind, PlayerId, Position};

/// Destroys an enemy piece inside the attacker's attack shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AttackAction {
    pub attacker_id: PieceId,
    pub target_id: PieceId,
}

impl AttackAction {
    pub fn new(attacker_id: PieceId, target_id: PieceId) -> Self {
        Self {
            attacker_id,
            target_id,
        }
    }
}

/// The piece removed by a successful attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AttackOutcome {
    pub destroyed: PieceId,
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub at: Position,
}

impl ActionTransition for AttackAction {
    type Error = ActionError;
    type Result = AttackOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let player = state.current_player;
        let attacker = own_active_piece(state, player, self.attacker_id)?;
        let target = state
            .board
            .find(self.target_id)
            .ok_or(ActionError::PieceNotFound(self.target_id))?;

        if target.owner == player {
            return Err(ActionError::NotAnEnemy(self.target_id));
        }
        if target.in_reinforcement_column() {
            return Err(ActionError::InReinforcementColumn(self.target_id));
        }
        require_influence(state, attacker)?;

        let offsets = geometry::attack_offsets(attacker.kind);
        if !geometry::within(attacker.position, offsets, target.position) {
            return Err(ActionError::NotInAttackZone {
                piece: self.attacker_id,
                target: self.target_id,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let at = state
            .board
            .find(self.target_id)
            .map(|piece| piece.position)
            .ok_or(ActionError::PieceNotFound(self.target_id))?;
        let destroyed = state
            .board
            .take(at)
            .ok_or(ActionError::PieceNotFound(self.target_id))?;
        state
            .player_mut(destroyed.owner)
            .casualties
            .push(destroyed.id);

        Ok(AttackOutcome {
            destroyed: destroyed.id,
            kind: destroyed.kind,
            owner: destroyed.owner,
            at,
        })
    }
}
