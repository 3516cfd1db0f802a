//! Zone overlays clients draw for a selected piece.

use serde::Serialize;

use vanguard_core::geometry::{allied_influence, attack_targets, movement_targets};
use vanguard_core::{GameState, PieceId, Position, Zone};

/// Cells a piece can currently reach, hit, or act within.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceZones {
    pub piece_id: PieceId,
    pub position: Position,
    /// Whether the piece stands inside its own side's influence and may act.
    pub in_influence: bool,
    pub movement: Zone,
    pub attack: Zone,
    /// Combined influence footprint of the owner's commanders.
    pub influence: Zone,
}

impl PieceZones {
    /// `None` when the piece is not on the board.
    pub fn compute(state: &GameState, piece_id: PieceId) -> Option<Self> {
        let piece = state.board.find(piece_id)?;
        let influence = allied_influence(&state.board, piece.owner);

        Some(Self {
            piece_id,
            position: piece.position,
            in_influence: influence.contains(piece.position),
            movement: movement_targets(&state.board, piece),
            attack: attack_targets(&state.board, piece),
            influence,
        })
    }
}
