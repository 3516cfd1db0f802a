//! Concrete in-turn actions. Each one validates against the current player
//! recorded in the state; [`PlayerAction`](crate::action::PlayerAction) has
//! already checked that the caller holds the turn.

mod ability;
mod combat;
mod end_turn;
mod movement;
mod reinforcement;

pub use ability::{AbilityOutcome, UseAbilityAction};
pub use combat::{AttackAction, AttackOutcome};
pub use end_turn::EndTurnAction;
pub use movement::{MoveAction, MoveOutcome};
pub use reinforcement::{AddToReinforcementsAction, DeployAction, DeployOutcome, QueueOutcome};
pub(crate) use reinforcement::{admit_staged_entry, enqueue_from_reserve};

use crate::action::ActionError;
use crate::geometry;
use crate::state::{BoardPiece, GameState, PieceId, PlayerId};

/// Looks up a piece the player may act with: owned, on the active field.
fn own_active_piece(
    state: &GameState,
    player: PlayerId,
    piece_id: PieceId,
) -> Result<&BoardPiece, ActionError> {
    let piece = state
        .board
        .find(piece_id)
        .ok_or(ActionError::PieceNotFound(piece_id))?;
    if piece.owner != player {
        return Err(ActionError::NotOwner {
            piece: piece_id,
            player,
        });
    }
    if piece.in_reinforcement_column() {
        return Err(ActionError::InReinforcementColumn(piece_id));
    }
    Ok(piece)
}

fn require_influence(state: &GameState, piece: &BoardPiece) -> Result<(), ActionError> {
    if geometry::allied_influence(&state.board, piece.owner).contains(piece.position) {
        Ok(())
    } else {
        Err(ActionError::OutsideInfluence {
            piece: piece.id,
            position: piece.position,
        })
    }
}
