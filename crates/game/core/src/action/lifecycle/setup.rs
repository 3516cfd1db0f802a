use std::collections::BTreeSet;

use crate::action::{ActionError, ActionTransition, require_phase};
use crate::config::GameConfig;
use crate::engine::economy;
use crate::state::{BoardPiece, GameState, Phase, PieceId, PieceKind, PlayerId, Position};

/// Puts the player's general on a chosen cell of its own half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceGeneralCommand {
    pub player: PlayerId,
    pub position: Position,
}

impl PlaceGeneralCommand {
    pub fn new(player: PlayerId, position: Position) -> Self {
        Self { player, position }
    }
}

impl ActionTransition for PlaceGeneralCommand {
    type Error = ActionError;
    type Result = PieceId;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::Setup)?;
        if state.board.general_of(self.player).is_some() {
            return Err(ActionError::GeneralAlreadyPlaced(self.player));
        }
        state
            .player(self.player)
            .reserve_general()
            .ok_or(ActionError::GeneralMissing(self.player))?;

        if !self.position.is_on_board() {
            return Err(ActionError::OutOfBounds(self.position));
        }
        if !self.position.is_active_field() {
            return Err(ActionError::OutsideActiveField(self.position));
        }
        if !self.player.owns_row(self.position.row) {
            return Err(ActionError::OutsideOwnHalf {
                player: self.player,
                position: self.position,
            });
        }
        if !state.board.is_free(self.position) {
            return Err(ActionError::Occupied(self.position));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let general = state
            .player(self.player)
            .reserve_general()
            .map(|piece| piece.id)
            .ok_or(ActionError::GeneralMissing(self.player))?;
        economy::place_general(state, self.player, general, self.position)?;
        Ok(general)
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}

/// Builds the initial reinforcement queue from four reserve pieces.
///
/// The first listed piece becomes the face-up head on the deployment row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SetupReinforcementsCommand {
    pub player: PlayerId,
    pub piece_ids: Vec<PieceId>,
}

impl SetupReinforcementsCommand {
    pub fn new(player: PlayerId, piece_ids: Vec<PieceId>) -> Self {
        Self { player, piece_ids }
    }
}

impl ActionTransition for SetupReinforcementsCommand {
    type Error = ActionError;
    type Result = ();

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::Setup)?;
        let player = state.player(self.player);
        if !player.reinforcements.is_empty() {
            return Err(ActionError::ReinforcementsAlreadyConfigured(self.player));
        }
        if self.piece_ids.len() != GameConfig::QUEUE_SIZE {
            return Err(ActionError::ReinforcementCount {
                expected: GameConfig::QUEUE_SIZE,
                actual: self.piece_ids.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for &id in &self.piece_ids {
            if !seen.insert(id) {
                return Err(ActionError::DuplicatePiece(id));
            }
            let piece = player
                .reserve_piece(id)
                .ok_or(ActionError::NotInReserve(id))?;
            if piece.kind == PieceKind::General {
                return Err(ActionError::GeneralNotQueueable(id));
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        for (index, &id) in self.piece_ids.iter().enumerate() {
            let player = state.player_mut(self.player);
            let piece = player
                .take_from_reserve(id)
                .ok_or(ActionError::NotInReserve(id))?;
            let entry = player.enqueue(piece).clone();
            let slot = self.player.reinforcement_slot(index);
            state.board.place(BoardPiece::queued(&entry, slot))?;
        }
        Ok(())
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pos, setup_state};

    #[test]
    fn places_general_in_own_half_only() {
        let state = setup_state(PlayerId::Player1);

        assert_eq!(
            PlaceGeneralCommand::new(PlayerId::Player1, pos(3, 3)).pre_validate(&state),
            Err(ActionError::OutsideOwnHalf {
                player: PlayerId::Player1,
                position: pos(3, 3),
            })
        );
        assert_eq!(
            PlaceGeneralCommand::new(PlayerId::Player2, pos(2, 7)).pre_validate(&state),
            Err(ActionError::OutsideActiveField(pos(2, 7)))
        );

        let mut state = state;
        let command = PlaceGeneralCommand::new(PlayerId::Player2, pos(1, 3));
        command.pre_validate(&state).unwrap();
        let general = command.apply(&mut state).unwrap();
        assert_eq!(state.board.get(pos(1, 3)).map(|p| p.id), Some(general));
        assert!(state.player(PlayerId::Player2).reserve_general().is_none());
        assert_eq!(
            command.pre_validate(&state),
            Err(ActionError::GeneralAlreadyPlaced(PlayerId::Player2))
        );
        state.check_invariants().unwrap();
    }

    #[test]
    fn setup_builds_the_queue_head_first() {
        let mut state = setup_state(PlayerId::Player1);
        let picks: Vec<PieceId> = state.player(PlayerId::Player1).reserve[1..5]
            .iter()
            .map(|p| p.id)
            .collect();

        let command = SetupReinforcementsCommand::new(PlayerId::Player1, picks.clone());
        command.pre_validate(&state).unwrap();
        command.apply(&mut state).unwrap();
        command.post_validate(&state).unwrap();

        let player = state.player(PlayerId::Player1);
        assert_eq!(player.reserve.len(), 16);
        for (index, entry) in player.reinforcements.iter().enumerate() {
            assert_eq!(entry.id, picks[index]);
            assert_eq!(entry.face_up, index == 0);
            let mirror = state.board.find(entry.id).unwrap();
            assert_eq!(mirror.position, PlayerId::Player1.reinforcement_slot(index));
        }
        assert_eq!(state.board.get(pos(7, 7)).map(|p| p.id), Some(picks[0]));
        assert_eq!(
            command.pre_validate(&state),
            Err(ActionError::ReinforcementsAlreadyConfigured(PlayerId::Player1))
        );
    }

    #[test]
    fn setup_rejects_bad_selections() {
        let state = setup_state(PlayerId::Player1);
        let reserve = &state.player(PlayerId::Player2).reserve;
        let general = reserve[0].id;
        let a = reserve[1].id;
        let b = reserve[2].id;
        let c = reserve[3].id;

        assert_eq!(
            SetupReinforcementsCommand::new(PlayerId::Player2, vec![a, b, c]).pre_validate(&state),
            Err(ActionError::ReinforcementCount {
                expected: 4,
                actual: 3,
            })
        );
        assert_eq!(
            SetupReinforcementsCommand::new(PlayerId::Player2, vec![a, b, c, a])
                .pre_validate(&state),
            Err(ActionError::DuplicatePiece(a))
        );
        assert_eq!(
            SetupReinforcementsCommand::new(PlayerId::Player2, vec![a, b, c, general])
                .pre_validate(&state),
            Err(ActionError::GeneralNotQueueable(general))
        );
        let foreign = state.player(PlayerId::Player1).reserve[1].id;
        assert_eq!(
            SetupReinforcementsCommand::new(PlayerId::Player2, vec![a, b, c, foreign])
                .pre_validate(&state),
            Err(ActionError::NotInReserve(foreign))
        );
    }
}
