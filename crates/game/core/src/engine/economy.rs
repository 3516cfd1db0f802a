//! Turn economy: action points, queue advancement, opening moves and victory.

use arrayvec::ArrayVec;

use crate::action::ActionError;
use crate::action::kinds::admit_staged_entry;
use crate::config::GameConfig;
use crate::state::{
    Board, BoardPiece, GameState, Phase, PieceId, PlayerId, Position, StateError,
};

/// One column-7 step taken by a queued piece at the end of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReinforcementStep {
    pub piece: PieceId,
    /// `None` when a waiting entry first enters the column.
    pub from: Option<Position>,
    pub to: Position,
}

/// Upper bound on steps in one advance: every queued piece moves once, plus
/// one waiting entry entering the column.
pub const MAX_REINFORCEMENT_STEPS: usize = GameConfig::QUEUE_SIZE + 1;

pub type ReinforcementSteps = ArrayVec<ReinforcementStep, MAX_REINFORCEMENT_STEPS>;

/// Action points granted by the player's commanders standing on the active field.
pub fn action_points(board: &Board, player: PlayerId) -> u32 {
    board
        .active_pieces_of(player)
        .map(|piece| piece.kind.command_points())
        .sum()
}

/// Resets the per-turn counters for the current player.
pub(crate) fn begin_turn(state: &mut GameState) {
    let player = state.current_player;
    let points = action_points(&state.board, player);
    state.actions_this_turn = 0;
    state.player_mut(player).action_points = points;
}

/// Shifts every column-7 piece of `player` one row toward its deployment row.
///
/// Pieces are processed nearest-first so a freed cell can be taken by the one
/// behind it; blocked pieces stay put. A waiting entry then claims the tail
/// slot if it became free.
pub(crate) fn advance_reinforcements(
    state: &mut GameState,
    player: PlayerId,
) -> Result<ReinforcementSteps, ActionError> {
    let mut steps = ReinforcementSteps::new();
    let overflow = |_| StateError::StepOverflow {
        player,
        capacity: MAX_REINFORCEMENT_STEPS,
    };
    for from in state.board.queued_pieces_of(player) {
        let to = from.translate(player.toward_deployment(), 0);
        if !to.is_reinforcement_column() || !state.board.is_free(to) {
            continue;
        }
        let piece = state
            .board
            .get(from)
            .map(|piece| piece.id)
            .ok_or(StateError::EmptyCell { position: from })?;
        state.board.relocate(from, to)?;
        steps
            .try_push(ReinforcementStep {
                piece,
                from: Some(from),
                to,
            })
            .map_err(overflow)?;
    }

    if let Some(piece) = admit_staged_entry(state, player)? {
        steps
            .try_push(ReinforcementStep {
                piece,
                from: None,
                to: player.tail_slot(),
            })
            .map_err(overflow)?;
    }
    Ok(steps)
}

/// Puts every general still in a reserve on its fallback cell.
pub(crate) fn auto_place_generals(state: &mut GameState) -> Result<Vec<PieceId>, ActionError> {
    let mut placed = Vec::new();
    for player in PlayerId::ALL {
        if state.board.general_of(player).is_some() {
            continue;
        }
        let general = state
            .player(player)
            .reserve_general()
            .map(|piece| piece.id)
            .ok_or(ActionError::GeneralMissing(player))?;
        place_general(state, player, general, player.fallback_general())?;
        placed.push(general);
    }
    Ok(placed)
}

/// Moves a reserve general onto `at`.
pub(crate) fn place_general(
    state: &mut GameState,
    player: PlayerId,
    general: PieceId,
    at: Position,
) -> Result<(), ActionError> {
    if !state.board.is_free(at) {
        return Err(ActionError::Occupied(at));
    }
    let piece = state
        .player_mut(player)
        .take_from_reserve(general)
        .ok_or(ActionError::NotInReserve(general))?;
    state
        .board
        .place(BoardPiece::deployed(piece.id, piece.kind, player, at))?;
    Ok(())
}

/// Steps the attacker's general one row toward the opponent.
///
/// The step is skipped when the cell ahead is taken or off the board; either
/// way the opening advance counts as resolved.
pub(crate) fn advance_attacker_general(state: &mut GameState) -> Option<Position> {
    let attacker = state.attacker();
    state.player_mut(attacker).general_advanced = true;

    let from = state.board.general_of(attacker)?.position;
    let to = from.translate(attacker.forward(), 0);
    if !to.is_active_field() || !state.board.is_free(to) {
        return None;
    }
    state.board.relocate(from, to).ok()?;
    Some(to)
}

/// The player whose opponent has lost its general, once the game is under way.
pub fn victor(state: &GameState) -> Option<PlayerId> {
    if !matches!(state.phase, Phase::Playing | Phase::PostTurn) {
        return None;
    }
    PlayerId::ALL
        .into_iter()
        .find(|player| state.board.general_of(*player).is_none())
        .map(PlayerId::opponent)
}

/// Ends the game when a general has fallen.
pub(crate) fn settle_victory(state: &mut GameState) -> Option<PlayerId> {
    let winner = victor(state)?;
    state.winner = Some(winner);
    state.phase = Phase::Finished;
    Some(winner)
}
