//! Dispatcher that owns the game registry and routes commands to game workers.
//!
//! Receives commands from [`RuntimeHandle`](crate::api::RuntimeHandle),
//! handles the cross-game ones itself (create, list, exists) and forwards
//! everything else to the [`GameWorker`] of the target game, spawning it on
//! first use.
//!
//! Forwarding never waits on a game's mailbox: a full mailbox rejects the
//! message with [`RuntimeError::GameBusy`], so a backlog on one game cannot
//! stall the others. Workers shut down after an idle period and are reaped
//! here; the registry only holds games with recent traffic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use vanguard_core::{GameId, GameState, PlayerId};

use super::game::{GameMessage, GameWorker};
use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, LifecycleEvent};
use crate::repository::{GameMetadata, GameRepository};

/// Commands that can be sent to the dispatcher
pub(crate) enum Command {
    CreateGame {
        reply: oneshot::Sender<Result<GameState>>,
    },
    ListGames {
        reply: oneshot::Sender<Result<Vec<GameMetadata>>>,
    },
    GameExists {
        game_id: GameId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Forwarded to the game's own worker.
    Game {
        game_id: GameId,
        message: GameMessage,
    },
}

struct WorkerSlot {
    sender: mpsc::Sender<GameMessage>,
    task: JoinHandle<()>,
}

pub(crate) struct Dispatcher {
    repository: Arc<dyn GameRepository>,
    event_bus: EventBus,
    command_rx: mpsc::Receiver<Command>,
    mailbox_size: usize,
    record_state_before: bool,
    idle_timeout: Duration,
    workers: HashMap<GameId, WorkerSlot>,
}

impl Dispatcher {
    pub(crate) fn new(
        repository: Arc<dyn GameRepository>,
        event_bus: EventBus,
        command_rx: mpsc::Receiver<Command>,
        mailbox_size: usize,
        record_state_before: bool,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            event_bus,
            command_rx,
            mailbox_size: mailbox_size.max(1),
            record_state_before,
            idle_timeout,
            workers: HashMap::new(),
        }
    }

    /// Main dispatcher loop. Ends once every handle is dropped, after all
    /// game workers have drained their mailboxes.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }

        for (game_id, slot) in self.workers.drain() {
            drop(slot.sender);
            if let Err(err) = slot.task.await {
                warn!("Game worker for {} failed to join: {}", game_id, err);
            }
        }
        debug!("Dispatcher stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        self.reap_finished_workers();
        match cmd {
            Command::CreateGame { reply } => {
                let result = self.create_game();
                if reply.send(result).is_err() {
                    debug!("CreateGame reply channel closed (caller dropped)");
                }
            }
            Command::ListGames { reply } => {
                let result = self.repository.list().map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("ListGames reply channel closed (caller dropped)");
                }
            }
            Command::GameExists { game_id, reply } => {
                let result = self.repository.exists(&game_id).map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!("GameExists reply channel closed (caller dropped)");
                }
            }
            Command::Game { game_id, message } => self.route(game_id, message).await,
        }
    }

    /// Creates a game with a random id and a coin-flip attacker.
    fn create_game(&self) -> Result<GameState> {
        let mut rng = rand::thread_rng();
        let game_id = GameId::new(format!("{:016x}", rng.r#gen::<u64>()));
        let attacker = if rng.gen_bool(0.5) {
            PlayerId::Player1
        } else {
            PlayerId::Player2
        };

        let state = GameState::new(game_id.clone(), attacker);
        self.repository.create(&state)?;

        info!("Created game {} (attacker: {})", game_id, attacker);
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::GameCreated { game_id, attacker }));
        Ok(state)
    }

    async fn route(&mut self, game_id: GameId, mut message: GameMessage) {
        let is_delete = message.is_delete();

        // Two attempts: the cached worker may have just shut down for idleness.
        for _ in 0..2 {
            if !self.workers.contains_key(&game_id) {
                match self.repository.exists(&game_id) {
                    Ok(true) => self.spawn_worker(game_id.clone()),
                    Ok(false) => return message.reject(RuntimeError::GameNotFound(game_id)),
                    Err(err) => return message.reject(err.into()),
                }
            }
            let Some(sender) = self.workers.get(&game_id).map(|slot| slot.sender.clone()) else {
                return message.reject(RuntimeError::CommandChannelClosed);
            };

            match sender.try_send(message) {
                Ok(()) => {
                    if is_delete {
                        drop(sender);
                        self.join_worker(&game_id).await;
                    }
                    return;
                }
                Err(mpsc::error::TrySendError::Full(rejected)) => {
                    warn!("Mailbox of game {} is full; rejecting", game_id);
                    return rejected.reject(RuntimeError::GameBusy(game_id));
                }
                Err(mpsc::error::TrySendError::Closed(returned)) => {
                    // The old worker still answers what it already accepted;
                    // its successor must not start before that.
                    debug!("Game worker for {} closed its mailbox", game_id);
                    drop(sender);
                    self.join_worker(&game_id).await;
                    message = returned;
                }
            }
        }
        message.reject(RuntimeError::CommandChannelClosed);
    }

    /// Removes the worker of `game_id` and waits for it to stop.
    async fn join_worker(&mut self, game_id: &GameId) {
        if let Some(slot) = self.workers.remove(game_id) {
            drop(slot.sender);
            if let Err(err) = slot.task.await {
                warn!("Game worker for {} failed to join: {}", game_id, err);
            }
        }
    }

    /// Forgets workers that already stopped on their own.
    fn reap_finished_workers(&mut self) {
        let before = self.workers.len();
        self.workers.retain(|_, slot| !slot.task.is_finished());
        let reaped = before - self.workers.len();
        if reaped > 0 {
            debug!("Reaped {} idle game workers", reaped);
        }
    }

    fn spawn_worker(&mut self, game_id: GameId) {
        let (sender, message_rx) = mpsc::channel(self.mailbox_size);
        let worker = GameWorker::new(
            game_id.clone(),
            Arc::clone(&self.repository),
            self.event_bus.clone(),
            self.record_state_before,
            self.idle_timeout,
            message_rx,
        );
        let task = tokio::spawn(async move {
            worker.run().await;
        });
        self.workers.insert(game_id, WorkerSlot { sender, task });
    }
}
