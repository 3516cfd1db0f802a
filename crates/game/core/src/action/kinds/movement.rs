use super::{own_active_piece, require_influence};
use crate::action::{ActionError, ActionTransition};
use crate::geometry;
use crate::state::{GameState, PieceId, Position};

/// Moves an own piece to a free cell of its movement shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MoveAction {
    pub piece_id: PieceId,
    pub to: Position,
}

impl MoveAction {
    pub fn new(piece_id: PieceId, to: Position) -> Self {
        Self { piece_id, to }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
}

impl ActionTransition for MoveAction {
    type Error = ActionError;
    type Result = MoveOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let piece = own_active_piece(state, state.current_player, self.piece_id)?;

        if !self.to.is_on_board() {
            return Err(ActionError::OutOfBounds(self.to));
        }
        if !self.to.is_active_field() {
            return Err(ActionError::OutsideActiveField(self.to));
        }
        require_influence(state, piece)?;

        let offsets = geometry::movement_offsets(piece.kind);
        if !geometry::within(piece.position, offsets, self.to) {
            return Err(ActionError::NotInMovementZone {
                piece: self.piece_id,
                to: self.to,
            });
        }
        if !state.board.is_free(self.to) {
            return Err(ActionError::Occupied(self.to));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let from = state
            .board
            .find(self.piece_id)
            .map(|piece| piece.position)
            .ok_or(ActionError::PieceNotFound(self.piece_id))?;
        state.board.relocate(from, self.to)?;
        Ok(MoveOutcome { from, to: self.to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PieceKind, PlayerId};
    use crate::testing::{StateBuilder, pos};

    #[test]
    fn moves_within_influence() {
        let (mut state, ids) = StateBuilder::playing(PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(7, 3))
            .piece(PieceKind::Infantryman, PlayerId::Player1, pos(6, 3))
            .piece(PieceKind::General, PlayerId::Player2, pos(0, 3))
            .build();

        let action = MoveAction::new(ids[1], pos(4, 3));
        action.pre_validate(&state).unwrap();
        let outcome = action.apply(&mut state).unwrap();

        assert_eq!(outcome.from, pos(6, 3));
        assert_eq!(state.board.get(pos(4, 3)).map(|p| p.id), Some(ids[1]));
        assert!(state.board.is_free(pos(6, 3)));
    }

    #[test]
    fn rejects_source_outside_influence() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(7, 3))
            .piece(PieceKind::Scout, PlayerId::Player1, pos(3, 0))
            .build();

        assert_eq!(
            MoveAction::new(ids[1], pos(2, 0)).pre_validate(&state),
            Err(ActionError::OutsideInfluence {
                piece: ids[1],
                position: pos(3, 0),
            })
        );
    }

    #[test]
    fn rejects_off_board_and_reinforcement_destinations() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player2)
            .piece(PieceKind::General, PlayerId::Player2, pos(3, 3))
            .piece(PieceKind::Colonel, PlayerId::Player2, pos(3, 2))
            .build();

        assert_eq!(
            MoveAction::new(ids[1], pos(3, 9)).pre_validate(&state),
            Err(ActionError::OutOfBounds(pos(3, 9)))
        );
        assert_eq!(
            MoveAction::new(ids[0], pos(3, 7)).pre_validate(&state),
            Err(ActionError::OutsideActiveField(pos(3, 7)))
        );
    }

    #[test]
    fn rejects_shape_and_occupancy_violations() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(6, 3))
            .piece(PieceKind::Colonel, PlayerId::Player1, pos(5, 3))
            .build();

        assert!(matches!(
            MoveAction::new(ids[1], pos(3, 3)).pre_validate(&state),
            Err(ActionError::NotInMovementZone { .. })
        ));
        assert_eq!(
            MoveAction::new(ids[0], pos(5, 3)).pre_validate(&state),
            Err(ActionError::Occupied(pos(5, 3)))
        );
    }

    #[test]
    fn rejects_pieces_of_the_opponent() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(7, 3))
            .piece(PieceKind::General, PlayerId::Player2, pos(0, 3))
            .build();

        assert!(matches!(
            MoveAction::new(ids[1], pos(1, 3)).pre_validate(&state),
            Err(ActionError::NotOwner { .. })
        ));
    }
}
