use crate::action::kinds::enqueue_from_reserve;
use crate::action::{ActionError, ActionTransition, QueueOutcome, require_phase};
use crate::engine::economy;
use crate::state::{GameState, Phase, PieceId, PieceKind, PlayerId};

/// Closes the post-turn window, optionally queueing one reserve piece, and
/// passes the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CompletePostTurnCommand {
    pub player: PlayerId,
    pub add_reinforcement: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reserve_piece_id: Option<PieceId>,
}

impl CompletePostTurnCommand {
    pub fn pass(player: PlayerId) -> Self {
        Self {
            player,
            add_reinforcement: false,
            reserve_piece_id: None,
        }
    }

    pub fn reinforce(player: PlayerId, piece: PieceId) -> Self {
        Self {
            player,
            add_reinforcement: true,
            reserve_piece_id: Some(piece),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TurnChange {
    pub next_player: PlayerId,
    pub turn_number: u32,
    pub action_points: u32,
    pub queued: Option<QueueOutcome>,
}

impl ActionTransition for CompletePostTurnCommand {
    type Error = ActionError;
    type Result = TurnChange;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::PostTurn)?;
        if self.player != state.current_player {
            return Err(ActionError::NotYourTurn {
                player: self.player,
                current: state.current_player,
            });
        }
        if !self.add_reinforcement {
            return Ok(());
        }

        let id = self
            .reserve_piece_id
            .ok_or(ActionError::MissingReservePiece)?;
        let piece = state
            .player(self.player)
            .reserve_piece(id)
            .ok_or(ActionError::NotInReserve(id))?;
        if piece.kind == PieceKind::General {
            return Err(ActionError::GeneralNotQueueable(id));
        }
        let slot = self.player.tail_slot();
        if !state.board.is_free(slot) {
            return Err(ActionError::SlotOccupied(slot));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let queued = match (self.add_reinforcement, self.reserve_piece_id) {
            (true, Some(id)) => Some(enqueue_from_reserve(state, self.player, id)?),
            (true, None) => return Err(ActionError::MissingReservePiece),
            (false, _) => None,
        };

        state.current_player = self.player.opponent();
        state.turn_number += 1;
        state.phase = Phase::Playing;
        economy::begin_turn(state);

        Ok(TurnChange {
            next_player: state.current_player,
            turn_number: state.turn_number,
            action_points: state.player(state.current_player).action_points,
            queued,
        })
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StateBuilder, pos};

    fn post_turn(current: PlayerId) -> StateBuilder {
        StateBuilder::playing(current).phase(Phase::PostTurn)
    }

    #[test]
    fn passes_the_turn_and_recomputes_points() {
        let (mut state, _) = post_turn(PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(7, 3))
            .piece(PieceKind::General, PlayerId::Player2, pos(0, 3))
            .piece(PieceKind::Colonel, PlayerId::Player2, pos(1, 3))
            .build();
        state.actions_this_turn = 2;

        let change = CompletePostTurnCommand::pass(PlayerId::Player1)
            .apply(&mut state)
            .unwrap();

        assert_eq!(
            change,
            TurnChange {
                next_player: PlayerId::Player2,
                turn_number: 2,
                action_points: 3,
                queued: None,
            }
        );
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.actions_this_turn, 0);
    }

    #[test]
    fn queues_a_reserve_piece_face_down_behind_a_head() {
        let (mut state, ids) = post_turn(PlayerId::Player2)
            .queued(PieceKind::Scout, PlayerId::Player2)
            .reserve(PieceKind::Infantryman, PlayerId::Player2)
            .build();

        let command = CompletePostTurnCommand::reinforce(PlayerId::Player2, ids[1]);
        command.pre_validate(&state).unwrap();
        let change = command.apply(&mut state).unwrap();

        let queued = change.queued.unwrap();
        assert_eq!(queued.queue_position, 1);
        assert_eq!(queued.cell, Some(pos(3, 7)));
        let entry = &state.player(PlayerId::Player2).reinforcements[1];
        assert!(!entry.face_up);
        assert!(!state.board.get(pos(3, 7)).unwrap().face_up);
    }

    #[test]
    fn add_requires_a_piece_and_a_free_tail_slot() {
        let (state, ids) = post_turn(PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .reserve(PieceKind::Scout, PlayerId::Player1)
            .build();

        let missing = CompletePostTurnCommand {
            player: PlayerId::Player1,
            add_reinforcement: true,
            reserve_piece_id: None,
        };
        assert_eq!(
            missing.pre_validate(&state),
            Err(ActionError::MissingReservePiece)
        );
        assert_eq!(
            CompletePostTurnCommand::reinforce(PlayerId::Player1, ids[4]).pre_validate(&state),
            Err(ActionError::SlotOccupied(pos(4, 7)))
        );
    }

    #[test]
    fn only_the_current_player_closes_the_window() {
        let (state, _) = post_turn(PlayerId::Player1).build();
        assert_eq!(
            CompletePostTurnCommand::pass(PlayerId::Player2).pre_validate(&state),
            Err(ActionError::NotYourTurn {
                player: PlayerId::Player2,
                current: PlayerId::Player1,
            })
        );
    }
}
