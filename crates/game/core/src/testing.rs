//! Fixtures shared by the unit tests.

use crate::action::{SelectDeckCommand, SetupReinforcementsCommand};
use crate::command::Command;
use crate::engine::GameEngine;
use crate::state::{
    BoardPiece, GameId, GameState, Phase, PieceId, PieceKind, PlayerId, Position, ReservePiece,
};

pub(crate) fn pos(row: i32, col: i32) -> Position {
    Position::new(row, col)
}

/// 4 colonels, 9 infantrymen, 6 scouts.
pub(crate) fn standard_deck() -> Vec<PieceKind> {
    let mut deck = vec![PieceKind::Colonel; 4];
    deck.extend([PieceKind::Infantryman; 9]);
    deck.extend([PieceKind::Scout; 6]);
    deck
}

/// A game in `setup` with both decks selected.
pub(crate) fn setup_state(attacker: PlayerId) -> GameState {
    let mut state = GameState::new(GameId::new("fixture"), attacker);
    let mut engine = GameEngine::new(&mut state);
    for player in PlayerId::ALL {
        engine
            .execute(&Command::SelectDeck(SelectDeckCommand::new(
                player,
                standard_deck(),
            )))
            .unwrap();
    }
    state
}

/// Queues reserve entries 1..=4 (the first non-general pieces) for both players.
pub(crate) fn configure_queues(state: &mut GameState) {
    for player in PlayerId::ALL {
        let picks = state.player(player).reserve[1..5]
            .iter()
            .map(|piece| piece.id)
            .collect();
        GameEngine::new(state)
            .execute(&Command::SetupReinforcements(
                SetupReinforcementsCommand::new(player, picks),
            ))
            .unwrap();
    }
}

/// A game on turn 1 with auto-placed generals.
pub(crate) fn started_game(attacker: PlayerId) -> GameState {
    let mut state = setup_state(attacker);
    configure_queues(&mut state);
    GameEngine::new(&mut state)
        .execute(&Command::StartGame)
        .unwrap();
    state
}

/// Hand-assembled positions for rule tests. Player1 is always the attacker.
pub(crate) struct StateBuilder {
    state: GameState,
    ids: Vec<PieceId>,
}

impl StateBuilder {
    pub(crate) fn playing(current: PlayerId) -> Self {
        let mut state = GameState::new(GameId::new("test"), PlayerId::Player1);
        state.phase = Phase::Playing;
        state.turn_number = 1;
        state.current_player = current;
        state.player_mut(current).action_points = 3;
        Self {
            state,
            ids: Vec::new(),
        }
    }

    pub(crate) fn phase(mut self, phase: Phase) -> Self {
        self.state.phase = phase;
        self
    }

    pub(crate) fn action_points(mut self, points: u32) -> Self {
        let current = self.state.current_player;
        self.state.player_mut(current).action_points = points;
        self
    }

    fn next_id(&mut self) -> PieceId {
        let id = self.state.allocate_piece_id().unwrap();
        self.ids.push(id);
        id
    }

    pub(crate) fn piece(mut self, kind: PieceKind, owner: PlayerId, at: Position) -> Self {
        let id = self.next_id();
        self.state
            .board
            .place(BoardPiece::deployed(id, kind, owner, at))
            .unwrap();
        self
    }

    pub(crate) fn reserve(mut self, kind: PieceKind, owner: PlayerId) -> Self {
        let id = self.next_id();
        self.state
            .player_mut(owner)
            .reserve
            .push(ReservePiece::new(id, kind, owner));
        self
    }

    /// Appends to `owner`'s queue and mirrors the entry on its own slot.
    pub(crate) fn queued(mut self, kind: PieceKind, owner: PlayerId) -> Self {
        let id = self.next_id();
        let player = self.state.player_mut(owner);
        let index = player.reinforcements.len();
        let entry = player
            .enqueue(ReservePiece::new(id, kind, owner))
            .clone();
        self.state
            .board
            .place(BoardPiece::queued(&entry, owner.reinforcement_slot(index)))
            .unwrap();
        self
    }

    pub(crate) fn build(self) -> (GameState, Vec<PieceId>) {
        (self.state, self.ids)
    }
}
