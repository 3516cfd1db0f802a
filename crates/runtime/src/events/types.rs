//! Event payloads published by game workers.

use serde::{Deserialize, Serialize};

use vanguard_core::{GameId, GameState, Phase, PlayerId};

use crate::repository::ActionId;

/// Per-game state stream. Only committed states are ever published.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// A command was accepted and its resulting state persisted.
    #[serde(rename_all = "camelCase")]
    StateUpdated {
        game_id: GameId,
        action_id: ActionId,
        command: String,
        state: Box<GameState>,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> &GameId {
        match self {
            GameEvent::StateUpdated { game_id, .. } => game_id,
        }
    }
}

/// Coarse lifecycle notifications, useful for lobbies and listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LifecycleEvent {
    #[serde(rename_all = "camelCase")]
    GameCreated { game_id: GameId, attacker: PlayerId },

    #[serde(rename_all = "camelCase")]
    PhaseChanged {
        game_id: GameId,
        from: Phase,
        to: Phase,
    },

    #[serde(rename_all = "camelCase")]
    GameFinished { game_id: GameId, winner: PlayerId },

    #[serde(rename_all = "camelCase")]
    GameDeleted { game_id: GameId },
}
