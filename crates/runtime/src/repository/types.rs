//! Records persisted alongside each game.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vanguard_core::{Command, GameId, GameState, Phase, PlayerId};

/// Sequential identifier of a history record, unique within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One accepted command in a game's append-only history.
///
/// `turn_number` is the turn in effect when the command was issued, so the
/// `completePostTurn` that hands over turn 3 is still recorded under turn 3.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub id: ActionId,
    pub timestamp: DateTime<Utc>,
    pub turn_number: u32,
    #[serde(rename = "playerId")]
    pub player: Option<PlayerId>,
    #[serde(rename = "action")]
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_before: Option<Box<GameState>>,
    pub state_after: Box<GameState>,
}

/// Summary of a stored game, kept in sync with every commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub id: GameId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub winner: Option<PlayerId>,
    pub attacker: PlayerId,
    /// Number of records in the history.
    pub action_count: u64,
}

impl GameMetadata {
    pub fn new(state: &GameState, now: DateTime<Utc>) -> Self {
        Self {
            id: state.id.clone(),
            created_at: now,
            updated_at: now,
            phase: state.phase,
            current_player: state.current_player,
            turn_number: state.turn_number,
            winner: state.winner,
            attacker: state.attacker(),
            action_count: 0,
        }
    }

    /// Refreshes the summary fields from the latest state.
    pub fn touch(&mut self, state: &GameState, now: DateTime<Utc>) {
        self.updated_at = now;
        self.phase = state.phase;
        self.current_player = state.current_player;
        self.turn_number = state.turn_number;
        self.winner = state.winner;
    }

    /// Identifier the next appended record will receive.
    pub fn next_action_id(&self) -> ActionId {
        ActionId(self.action_count + 1)
    }
}
