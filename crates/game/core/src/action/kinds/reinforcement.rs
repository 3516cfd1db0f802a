use crate::action::{ActionError, ActionTransition};
use crate::state::{BoardPiece, GameState, PieceId, PieceKind, PlayerId, Position};

/// Brings the queue head onto the player's deployment row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DeployAction {
    pub piece_id: PieceId,
    pub to: Position,
}

impl DeployAction {
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
pub struct DeployOutcome {
    pub to: Position,
    /// Entry that became the new, now face-up, queue head.
    pub revealed: Option<PieceId>,
}

impl ActionTransition for DeployAction {
    type Error = ActionError;
    type Result = DeployOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let player = state.current_player;
        let owner = state.player(player);
        owner
            .queue_entry(self.piece_id)
            .ok_or(ActionError::NotQueued(self.piece_id))?;
        if owner.queue_head().map(|head| head.id) != Some(self.piece_id) {
            return Err(ActionError::NotQueueHead(self.piece_id));
        }

        let expected = player.deployment_row();
        if self.to.row != expected {
            return Err(ActionError::NotDeploymentRow {
                expected,
                actual: self.to.row,
            });
        }
        if !self.to.is_active_field() {
            return Err(ActionError::OutsideActiveField(self.to));
        }
        if state.board.enemy_on_row(player, expected) {
            return Err(ActionError::DeploymentBlocked);
        }
        if !state.board.is_free(self.to) {
            return Err(ActionError::Occupied(self.to));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let player = state.current_player;

        if let Some(cell) = state.board.find(self.piece_id).map(|piece| piece.position) {
            state.board.take(cell);
        }
        let (head, revealed) = state
            .player_mut(player)
            .dequeue_head()
            .ok_or(ActionError::NotQueued(self.piece_id))?;
        if let Some(mirror) = revealed.and_then(|id| state.board.find_mut(id)) {
            mirror.face_up = true;
        }

        state
            .board
            .place(BoardPiece::deployed(head.id, head.kind, player, self.to))?;

        Ok(DeployOutcome {
            to: self.to,
            revealed,
        })
    }
}

/// Moves a reserve piece to the tail of the player's queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AddToReinforcementsAction {
    pub piece_id: PieceId,
}

impl AddToReinforcementsAction {
    pub fn new(piece_id: PieceId) -> Self {
        Self { piece_id }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct QueueOutcome {
    pub queue_position: u32,
    /// Column-7 cell the entry landed on; `None` while the tail slot is taken.
    pub cell: Option<Position>,
}

impl ActionTransition for AddToReinforcementsAction {
    type Error = ActionError;
    type Result = QueueOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let piece = state
            .player(state.current_player)
            .reserve_piece(self.piece_id)
            .ok_or(ActionError::NotInReserve(self.piece_id))?;
        if piece.kind == PieceKind::General {
            return Err(ActionError::GeneralNotQueueable(self.piece_id));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let player = state.current_player;
        enqueue_from_reserve(state, player, self.piece_id)
    }
}

/// Appends a reserve piece to the queue.
///
/// A free tail slot goes to the oldest entry still waiting for a cell, so the
/// new entry only lands on the column when nothing queued before it waits.
pub(crate) fn enqueue_from_reserve(
    state: &mut GameState,
    player: PlayerId,
    piece_id: PieceId,
) -> Result<QueueOutcome, ActionError> {
    let piece = state
        .player_mut(player)
        .take_from_reserve(piece_id)
        .ok_or(ActionError::NotInReserve(piece_id))?;
    let queue_position = state.player_mut(player).enqueue(piece).queue_position;

    admit_staged_entry(state, player)?;
    let cell = state.board.find(piece_id).map(|piece| piece.position);
    Ok(QueueOutcome {
        queue_position,
        cell,
    })
}

/// Places the first queued entry without a column-7 cell onto the tail slot.
///
/// Returns the entry that entered the column, if any.
pub(crate) fn admit_staged_entry(
    state: &mut GameState,
    player: PlayerId,
) -> Result<Option<PieceId>, ActionError> {
    let slot = player.tail_slot();
    if !state.board.is_free(slot) {
        return Ok(None);
    }
    let staged = state
        .player(player)
        .reinforcements
        .iter()
        .find(|entry| state.board.find(entry.id).is_none())
        .cloned();
    match staged {
        Some(entry) => {
            state.board.place(BoardPiece::queued(&entry, slot))?;
            Ok(Some(entry.id))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StateBuilder, pos};

    #[test]
    fn deploys_head_and_reveals_next() {
        let (mut state, ids) = StateBuilder::playing(PlayerId::Player1)
            .queued(PieceKind::Colonel, PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .build();

        let action = DeployAction::new(ids[0], pos(7, 2));
        action.pre_validate(&state).unwrap();
        let outcome = action.apply(&mut state).unwrap();

        assert_eq!(outcome.revealed, Some(ids[1]));
        let deployed = state.board.get(pos(7, 2)).unwrap();
        assert_eq!(deployed.id, ids[0]);
        assert!(deployed.face_up);
        assert_eq!(deployed.ability_charges, PieceKind::Colonel.initial_charges());
        assert!(state.board.is_free(pos(7, 7)));

        let queue = &state.player(PlayerId::Player1).reinforcements;
        assert_eq!(queue.len(), 1);
        assert_eq!((queue[0].id, queue[0].queue_position, queue[0].face_up), (ids[1], 0, true));
        assert!(state.board.find(ids[1]).unwrap().face_up);
        state.check_invariants().unwrap();
    }

    #[test]
    fn only_the_head_may_deploy() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player2)
            .queued(PieceKind::Scout, PlayerId::Player2)
            .queued(PieceKind::Scout, PlayerId::Player2)
            .build();

        assert_eq!(
            DeployAction::new(ids[1], pos(0, 1)).pre_validate(&state),
            Err(ActionError::NotQueueHead(ids[1]))
        );
        assert_eq!(
            DeployAction::new(PieceId(99), pos(0, 1)).pre_validate(&state),
            Err(ActionError::NotQueued(PieceId(99)))
        );
    }

    #[test]
    fn deployment_row_and_column_rules() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player2)
            .queued(PieceKind::Infantryman, PlayerId::Player2)
            .build();

        assert_eq!(
            DeployAction::new(ids[0], pos(1, 1)).pre_validate(&state),
            Err(ActionError::NotDeploymentRow {
                expected: 0,
                actual: 1,
            })
        );
        assert_eq!(
            DeployAction::new(ids[0], pos(0, 7)).pre_validate(&state),
            Err(ActionError::OutsideActiveField(pos(0, 7)))
        );
    }

    #[test]
    fn enemy_on_deployment_row_blocks_everything() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .piece(PieceKind::Scout, PlayerId::Player2, pos(7, 0))
            .build();

        for col in 1..7 {
            assert_eq!(
                DeployAction::new(ids[0], pos(7, col)).pre_validate(&state),
                Err(ActionError::DeploymentBlocked),
                "column {col}"
            );
        }
    }

    #[test]
    fn own_piece_on_destination_is_occupied() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .queued(PieceKind::Scout, PlayerId::Player1)
            .piece(PieceKind::General, PlayerId::Player1, pos(7, 3))
            .build();

        assert_eq!(
            DeployAction::new(ids[0], pos(7, 3)).pre_validate(&state),
            Err(ActionError::Occupied(pos(7, 3)))
        );
    }

    #[test]
    fn add_places_on_tail_slot_and_reveals_only_a_new_head() {
        let (mut state, ids) = StateBuilder::playing(PlayerId::Player1)
            .reserve(PieceKind::Scout, PlayerId::Player1)
            .reserve(PieceKind::Colonel, PlayerId::Player1)
            .build();

        let first = AddToReinforcementsAction::new(ids[0]).apply(&mut state).unwrap();
        assert_eq!(first.cell, Some(pos(4, 7)));
        assert!(state.player(PlayerId::Player1).reinforcements[0].face_up);

        // Tail slot is still taken by the first entry: the second waits for a cell.
        let second = AddToReinforcementsAction::new(ids[1]).apply(&mut state).unwrap();
        assert_eq!(second, QueueOutcome { queue_position: 1, cell: None });
        assert!(!state.player(PlayerId::Player1).reinforcements[1].face_up);
        assert!(state.player(PlayerId::Player1).reserve.is_empty());
        state.check_invariants().unwrap();
    }

    #[test]
    fn freed_tail_slot_goes_to_the_oldest_waiting_entry() {
        let (mut state, ids) = StateBuilder::playing(PlayerId::Player1)
            .reserve(PieceKind::Scout, PlayerId::Player1)
            .reserve(PieceKind::Colonel, PlayerId::Player1)
            .reserve(PieceKind::Infantryman, PlayerId::Player1)
            .build();
        let (first, waiting, newest) = (ids[0], ids[1], ids[2]);

        AddToReinforcementsAction::new(first).apply(&mut state).unwrap();
        let staged = AddToReinforcementsAction::new(waiting).apply(&mut state).unwrap();
        assert_eq!(staged.cell, None);

        // Deploying the head frees the tail slot while `waiting` has no cell yet.
        DeployAction::new(first, pos(7, 0)).apply(&mut state).unwrap();
        assert!(state.board.is_free(pos(4, 7)));

        let added = AddToReinforcementsAction::new(newest).apply(&mut state).unwrap();
        assert_eq!(added, QueueOutcome { queue_position: 1, cell: None });
        assert_eq!(state.board.find(waiting).unwrap().position, pos(4, 7));
        assert!(state.board.find(waiting).unwrap().face_up);

        crate::engine::economy::advance_reinforcements(&mut state, PlayerId::Player1).unwrap();

        // The head stays nearest to deployment row 7.
        assert_eq!(state.board.find(waiting).unwrap().position, pos(5, 7));
        assert_eq!(state.board.find(newest).unwrap().position, pos(4, 7));
        let queue: Vec<_> = state
            .player(PlayerId::Player1)
            .reinforcements
            .iter()
            .map(|entry| (entry.id, entry.queue_position, entry.face_up))
            .collect();
        assert_eq!(queue, vec![(waiting, 0, true), (newest, 1, false)]);
        assert!(!state.board.find(newest).unwrap().face_up);
        state.check_invariants().unwrap();
    }

    #[test]
    fn generals_and_unknown_pieces_cannot_be_queued() {
        let (state, ids) = StateBuilder::playing(PlayerId::Player1)
            .reserve(PieceKind::General, PlayerId::Player1)
            .reserve(PieceKind::Scout, PlayerId::Player2)
            .build();

        assert_eq!(
            AddToReinforcementsAction::new(ids[0]).pre_validate(&state),
            Err(ActionError::GeneralNotQueueable(ids[0]))
        );
        assert_eq!(
            AddToReinforcementsAction::new(ids[1]).pre_validate(&state),
            Err(ActionError::NotInReserve(ids[1]))
        );
    }
}
