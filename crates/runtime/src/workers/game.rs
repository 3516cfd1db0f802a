//! Per-game worker that serializes every operation on one game.
//!
//! A [`GameWorker`] owns the mailbox of exactly one game id. Each message is
//! handled to completion (load → validate → apply → persist → publish) before
//! the next one is received, so two commands for the same game can never
//! interleave their read-modify-write cycles.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use vanguard_core::{
    Command as GameCommand, ExecutionOutcome, GameEngine, GameError, GameId, GameState, PieceId,
};

use crate::api::{PieceZones, Result, RuntimeError};
use crate::events::{Event, EventBus, GameEvent, LifecycleEvent};
use crate::repository::{ActionId, ActionRecord, GameRepository};

/// Messages handled by a [`GameWorker`].
pub(crate) enum GameMessage {
    /// Run a command through the engine and commit it.
    Execute {
        command: GameCommand,
        reply: oneshot::Sender<Result<GameState>>,
    },
    /// Latest committed snapshot.
    Snapshot {
        reply: oneshot::Sender<Result<GameState>>,
    },
    History {
        reply: oneshot::Sender<Result<Vec<ActionRecord>>>,
    },
    ReplayToAction {
        action_id: ActionId,
        reply: oneshot::Sender<Result<GameState>>,
    },
    ReplayToTurn {
        turn_number: u32,
        reply: oneshot::Sender<Result<GameState>>,
    },
    Zones {
        piece_id: PieceId,
        reply: oneshot::Sender<Result<PieceZones>>,
    },
    /// Remove the game; the worker stops afterwards.
    Delete { reply: oneshot::Sender<Result<()>> },
}

impl GameMessage {
    pub(crate) fn is_delete(&self) -> bool {
        matches!(self, GameMessage::Delete { .. })
    }

    /// Answers the message with `err` without handling it.
    pub(crate) fn reject(self, err: RuntimeError) {
        let delivered = match self {
            GameMessage::Execute { reply, .. }
            | GameMessage::Snapshot { reply }
            | GameMessage::ReplayToAction { reply, .. }
            | GameMessage::ReplayToTurn { reply, .. } => reply.send(Err(err)).is_ok(),
            GameMessage::History { reply } => reply.send(Err(err)).is_ok(),
            GameMessage::Zones { reply, .. } => reply.send(Err(err)).is_ok(),
            GameMessage::Delete { reply } => reply.send(Err(err)).is_ok(),
        };
        if !delivered {
            debug!("Rejection reply channel closed (caller dropped)");
        }
    }
}

/// Background task owning one game's mailbox.
pub(crate) struct GameWorker {
    game_id: GameId,
    repository: Arc<dyn GameRepository>,
    event_bus: EventBus,
    record_state_before: bool,
    idle_timeout: Duration,
    message_rx: mpsc::Receiver<GameMessage>,
}

impl GameWorker {
    pub(crate) fn new(
        game_id: GameId,
        repository: Arc<dyn GameRepository>,
        event_bus: EventBus,
        record_state_before: bool,
        idle_timeout: Duration,
        message_rx: mpsc::Receiver<GameMessage>,
    ) -> Self {
        Self {
            game_id,
            repository,
            event_bus,
            record_state_before,
            idle_timeout,
            message_rx,
        }
    }

    /// Main worker loop.
    ///
    /// Stops when the mailbox closes, after a delete, or once no message
    /// arrived for `idle_timeout`. An idle stop closes the mailbox first and
    /// still answers every message that was already queued.
    pub(crate) async fn run(mut self) {
        debug!("Game worker for {} started", self.game_id);
        loop {
            tokio::select! {
                message = self.message_rx.recv() => match message {
                    Some(message) => {
                        if !self.handle_message(message) {
                            break;
                        }
                    }
                    None => break,
                },
                _ = tokio::time::sleep(self.idle_timeout) => {
                    self.message_rx.close();
                    while let Some(message) = self.message_rx.recv().await {
                        if !self.handle_message(message) {
                            break;
                        }
                    }
                    debug!("Game worker for {} idle, shutting down", self.game_id);
                    break;
                }
            }
        }
        debug!("Game worker for {} stopped", self.game_id);
    }

    /// Returns `false` once the worker should stop.
    fn handle_message(&mut self, message: GameMessage) -> bool {
        match message {
            GameMessage::Execute { command, reply } => {
                let result = self.execute(command);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            GameMessage::Snapshot { reply } => {
                if reply.send(self.load()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            GameMessage::History { reply } => {
                let result = self.repository.history(&self.game_id).map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("History reply channel closed (caller dropped)");
                }
            }
            GameMessage::ReplayToAction { action_id, reply } => {
                let result = self.replay_to_action(action_id);
                if reply.send(result).is_err() {
                    debug!("ReplayToAction reply channel closed (caller dropped)");
                }
            }
            GameMessage::ReplayToTurn { turn_number, reply } => {
                let result = self.replay_to_turn(turn_number);
                if reply.send(result).is_err() {
                    debug!("ReplayToTurn reply channel closed (caller dropped)");
                }
            }
            GameMessage::Zones { piece_id, reply } => {
                let result = self.zones(piece_id);
                if reply.send(result).is_err() {
                    debug!("Zones reply channel closed (caller dropped)");
                }
            }
            GameMessage::Delete { reply } => {
                let result = self.delete();
                let deleted = result.is_ok();
                if reply.send(result).is_err() {
                    debug!("Delete reply channel closed (caller dropped)");
                }
                return !deleted;
            }
        }
        true
    }

    fn load(&self) -> Result<GameState> {
        self.repository
            .load(&self.game_id)?
            .ok_or_else(|| RuntimeError::GameNotFound(self.game_id.clone()))
    }

    /// Validates and applies `command`, then commits it.
    ///
    /// Events go out only after the commit succeeded. A rejected command
    /// leaves both the store and the bus untouched.
    fn execute(&self, command: GameCommand) -> Result<GameState> {
        let mut state = self.load()?;
        let metadata = self
            .repository
            .metadata(&self.game_id)?
            .ok_or_else(|| RuntimeError::GameNotFound(self.game_id.clone()))?;

        let state_before = self.record_state_before.then(|| Box::new(state.clone()));
        let turn_number = state.turn_number;

        let outcome = match GameEngine::new(&mut state).execute(&command) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "Rejected {} on game {} [{}]: {}",
                    command.as_str(),
                    self.game_id,
                    err.error_code(),
                    err
                );
                return Err(err.into());
            }
        };

        let record = ActionRecord {
            id: metadata.next_action_id(),
            timestamp: Utc::now(),
            turn_number,
            player: command.player(),
            command,
            state_before,
            state_after: Box::new(state.clone()),
        };
        self.repository.commit(&self.game_id, &record)?;

        debug!(
            "Committed {} #{} on game {} (turn {})",
            record.command.as_str(),
            record.id,
            self.game_id,
            record.turn_number
        );

        self.publish(&record, &outcome);
        Ok(state)
    }

    fn publish(&self, record: &ActionRecord, outcome: &ExecutionOutcome) {
        self.event_bus.publish(Event::Game(GameEvent::StateUpdated {
            game_id: self.game_id.clone(),
            action_id: record.id,
            command: record.command.as_str().to_string(),
            state: record.state_after.clone(),
        }));

        if outcome.phase_changed() {
            info!(
                "Game {} moved from {} to {}",
                self.game_id, outcome.phase_before, outcome.phase_after
            );
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::PhaseChanged {
                    game_id: self.game_id.clone(),
                    from: outcome.phase_before,
                    to: outcome.phase_after,
                }));
        }

        if let Some(winner) = outcome.winner {
            info!("Game {} won by {}", self.game_id, winner);
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::GameFinished {
                    game_id: self.game_id.clone(),
                    winner,
                }));
        }
    }

    /// State right after the given history record.
    fn replay_to_action(&self, action_id: ActionId) -> Result<GameState> {
        self.repository
            .history(&self.game_id)?
            .into_iter()
            .find(|record| record.id == action_id)
            .map(|record| *record.state_after)
            .ok_or_else(|| RuntimeError::ActionNotFound {
                game_id: self.game_id.clone(),
                action_id,
            })
    }

    /// State after the last command recorded during `turn_number`.
    fn replay_to_turn(&self, turn_number: u32) -> Result<GameState> {
        self.repository
            .history(&self.game_id)?
            .into_iter()
            .rev()
            .find(|record| record.turn_number == turn_number)
            .map(|record| *record.state_after)
            .ok_or_else(|| RuntimeError::TurnNotFound {
                game_id: self.game_id.clone(),
                turn_number,
            })
    }

    fn zones(&self, piece_id: PieceId) -> Result<PieceZones> {
        let state = self.load()?;
        PieceZones::compute(&state, piece_id).ok_or_else(|| RuntimeError::PieceNotFound {
            game_id: self.game_id.clone(),
            piece_id,
        })
    }

    fn delete(&self) -> Result<()> {
        if !self.repository.delete(&self.game_id)? {
            return Err(RuntimeError::GameNotFound(self.game_id.clone()));
        }
        info!("Deleted game {}", self.game_id);
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::GameDeleted {
                game_id: self.game_id.clone(),
            }));
        Ok(())
    }
}
