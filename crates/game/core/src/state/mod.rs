//! Authoritative game state representation.
//!
//! This module owns the board, the two player records and the phase/turn
//! bookkeeping. Runtime layers clone or query this state but mutate it
//! exclusively through the engine.
mod board;
mod error;
pub mod types;

use std::collections::BTreeSet;

pub use board::Board;
pub use error::StateError;
pub use types::{
    Ability, AbilityCharges, BoardPiece, GameId, PieceId, PieceKind, PlayerId, PlayerState,
    Players, Position, ReinforcementPiece, ReservePiece, Role,
};

use crate::config::GameConfig;

/// Lifecycle phase. Serialized in kebab-case (`"deck-selection"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Phase {
    DeckSelection,
    Setup,
    Playing,
    PostTurn,
    Finished,
}

/// Canonical snapshot of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GameState {
    pub id: GameId,
    pub phase: Phase,
    pub board: Board,
    pub players: Players,
    pub current_player: PlayerId,
    /// 0 until the game starts, then 1-based.
    pub turn_number: u32,
    pub actions_this_turn: u32,
    pub winner: Option<PlayerId>,
    /// Sequential piece id allocator. Never reused.
    next_piece_id: u32,
}

impl GameState {
    /// Creates a game in deck selection. The defender holds the turn pointer
    /// from the start because it plays first.
    pub fn new(id: GameId, attacker: PlayerId) -> Self {
        let player1_role = if attacker == PlayerId::Player1 {
            Role::Attacker
        } else {
            Role::Defender
        };
        Self {
            id,
            phase: Phase::DeckSelection,
            board: Board::new(),
            players: Players::new(player1_role),
            current_player: attacker.opponent(),
            turn_number: 0,
            actions_this_turn: 0,
            winner: None,
            next_piece_id: 1,
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        self.players.get_mut(id)
    }

    pub fn attacker(&self) -> PlayerId {
        self.players.with_role(Role::Attacker).id
    }

    pub fn defender(&self) -> PlayerId {
        self.players.with_role(Role::Defender).id
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Allocates a new unique PieceId.
    pub fn allocate_piece_id(&mut self) -> Result<PieceId, StateError> {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id = self
            .next_piece_id
            .checked_add(1)
            .ok_or(StateError::PieceIdOverflow {
                current: self.next_piece_id,
            })?;
        Ok(id)
    }

    /// Verifies the structural invariants every committed snapshot satisfies.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        for (cell, occupant) in self.board.cells() {
            match occupant {
                Some(piece) if piece.position != cell => {
                    return Err(StateError::OccupancyDesync {
                        piece: piece.id,
                        cell,
                        recorded: piece.position,
                    });
                }
                _ => {}
            }
        }

        let mut seen = BTreeSet::new();
        for player in self.players.iter() {
            self.check_player(player, &mut seen)?;
        }

        if self.is_finished() != self.winner.is_some() {
            return Err(StateError::WinnerMismatch);
        }
        Ok(())
    }

    fn check_player(
        &self,
        player: &PlayerState,
        seen: &mut BTreeSet<PieceId>,
    ) -> Result<(), StateError> {
        let owner = player.id;
        let mut record = |piece: PieceId| {
            if seen.insert(piece) {
                Ok(())
            } else {
                Err(StateError::DuplicatePiece { piece })
            }
        };

        for piece in &player.reserve {
            record(piece.id)?;
        }

        for (index, entry) in player.reinforcements.iter().enumerate() {
            if entry.queue_position as usize != index {
                return Err(StateError::QueueNumbering {
                    player: owner,
                    index,
                });
            }
            if entry.face_up != (index == 0) {
                return Err(StateError::QueueVisibility { player: owner });
            }
            if entry.kind == PieceKind::General {
                return Err(StateError::QueuedGeneral {
                    player: owner,
                    piece: entry.id,
                });
            }
            record(entry.id)?;
        }

        for piece in self.board.pieces().filter(|piece| piece.owner == owner) {
            if piece.in_reinforcement_column() {
                // Column-7 cells mirror queue entries; they are not a location of their own.
                match player.queue_entry(piece.id) {
                    Some(entry) if entry.face_up == piece.face_up => {}
                    Some(_) => return Err(StateError::QueueVisibility { player: owner }),
                    None => {
                        return Err(StateError::UnqueuedReinforcement {
                            piece: piece.id,
                            owner,
                        });
                    }
                }
            } else {
                record(piece.id)?;
            }
        }

        let generals = player
            .reserve
            .iter()
            .filter(|piece| piece.kind == PieceKind::General)
            .count()
            + self
                .board
                .active_pieces_of(owner)
                .filter(|piece| piece.kind == PieceKind::General)
                .count();
        if generals > 1 {
            return Err(StateError::GeneralCount {
                player: owner,
                count: generals,
            });
        }

        if player.deck_selected {
            let actual = player.reserve.len()
                + player.reinforcements.len()
                + self.board.active_pieces_of(owner).count()
                + player.casualties.len();
            if actual != GameConfig::RESERVE_SIZE {
                return Err(StateError::PieceConservation {
                    player: owner,
                    expected: GameConfig::RESERVE_SIZE,
                    actual,
                });
            }
        }
        Ok(())
    }
}
