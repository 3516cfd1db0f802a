//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers one async method per
//! game operation. Every mutating method returns the committed state.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use vanguard_core::catalog::{CATALOG, PieceDefinition};
use vanguard_core::{
    Action, Command as GameCommand, CompletePostTurnCommand, GameId, GameState, PieceId,
    PieceKind, PlaceGeneralCommand, PlayerId, Position, SelectDeckCommand,
    SetupReinforcementsCommand,
};

use super::errors::{Result, RuntimeError};
use super::request::ActionRequest;
use super::zones::PieceZones;
use crate::events::{Event, EventBus, Topic};
use crate::repository::{ActionId, ActionRecord, GameMetadata};
use crate::workers::{Command, GameMessage};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    async fn game_request<T>(
        &self,
        game_id: &GameId,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> GameMessage,
    ) -> Result<T> {
        let game_id = game_id.clone();
        self.request(move |reply| Command::Game {
            game_id,
            message: build(reply),
        })
        .await
    }

    /// Creates a game in deck selection with a random attacker.
    pub async fn create_game(&self) -> Result<GameState> {
        self.request(|reply| Command::CreateGame { reply }).await
    }

    /// Runs any engine command against a game and commits it.
    pub async fn execute(&self, game_id: &GameId, command: GameCommand) -> Result<GameState> {
        self.game_request(game_id, |reply| GameMessage::Execute { command, reply }).await
    }

    /// Submits a player's 19 non-general pieces; the general is added by the engine.
    pub async fn select_deck(
        &self,
        game_id: &GameId,
        player: PlayerId,
        pieces: Vec<PieceKind>,
    ) -> Result<GameState> {
        let command = GameCommand::SelectDeck(SelectDeckCommand::new(player, pieces));
        self.execute(game_id, command).await
    }

    pub async fn place_general(
        &self,
        game_id: &GameId,
        player: PlayerId,
        position: Position,
    ) -> Result<GameState> {
        let command = GameCommand::PlaceGeneral(PlaceGeneralCommand::new(player, position));
        self.execute(game_id, command).await
    }

    pub async fn setup_reinforcements(
        &self,
        game_id: &GameId,
        player: PlayerId,
        piece_ids: Vec<PieceId>,
    ) -> Result<GameState> {
        let command =
            GameCommand::SetupReinforcements(SetupReinforcementsCommand::new(player, piece_ids));
        self.execute(game_id, command).await
    }

    pub async fn start_game(&self, game_id: &GameId) -> Result<GameState> {
        self.execute(game_id, GameCommand::StartGame).await
    }

    pub async fn execute_action(
        &self,
        game_id: &GameId,
        player: PlayerId,
        action: Action,
    ) -> Result<GameState> {
        self.execute(game_id, GameCommand::play(player, action)).await
    }

    /// Validates a loosely typed action document, then executes it.
    ///
    /// Validation failures are reported before the game is touched.
    pub async fn execute_request(
        &self,
        game_id: &GameId,
        player: PlayerId,
        request: ActionRequest,
    ) -> Result<GameState> {
        let action = Action::try_from(request)?;
        self.execute_action(game_id, player, action).await
    }

    pub async fn complete_post_turn(
        &self,
        game_id: &GameId,
        player: PlayerId,
        add_reinforcement: bool,
        reserve_piece_id: Option<PieceId>,
    ) -> Result<GameState> {
        let command = GameCommand::CompletePostTurn(CompletePostTurnCommand {
            player,
            add_reinforcement,
            reserve_piece_id,
        });
        self.execute(game_id, command).await
    }

    /// Latest committed state of a game.
    pub async fn get_game(&self, game_id: &GameId) -> Result<GameState> {
        self.game_request(game_id, |reply| GameMessage::Snapshot { reply }).await
    }

    pub async fn list_games(&self) -> Result<Vec<GameMetadata>> {
        self.request(|reply| Command::ListGames { reply }).await
    }

    pub async fn get_game_history(&self, game_id: &GameId) -> Result<Vec<ActionRecord>> {
        self.game_request(game_id, |reply| GameMessage::History { reply }).await
    }

    /// State right after the given history record.
    pub async fn replay_to_action(
        &self,
        game_id: &GameId,
        action_id: ActionId,
    ) -> Result<GameState> {
        self.game_request(game_id, |reply| GameMessage::ReplayToAction { action_id, reply }).await
    }

    /// State after the last command issued during `turn_number`.
    pub async fn replay_to_turn(&self, game_id: &GameId, turn_number: u32) -> Result<GameState> {
        self.game_request(game_id, |reply| GameMessage::ReplayToTurn {
            turn_number,
            reply,
        })
        .await
    }

    pub async fn delete_game(&self, game_id: &GameId) -> Result<()> {
        self.game_request(game_id, |reply| GameMessage::Delete { reply }).await
    }

    pub async fn game_exists(&self, game_id: &GameId) -> Result<bool> {
        let game_id = game_id.clone();
        self.request(|reply| Command::GameExists { game_id, reply }).await
    }

    /// Movement, attack and influence cells of one piece on the board.
    pub async fn zones(&self, game_id: &GameId, piece_id: PieceId) -> Result<PieceZones> {
        self.game_request(game_id, |reply| GameMessage::Zones { piece_id, reply }).await
    }

    /// Static piece catalogue.
    pub fn rules(&self) -> &'static [PieceDefinition] {
        &CATALOG
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Game` - committed states of every game
    /// - `Topic::Lifecycle` - creation, phase changes, victories, deletions
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use vanguard_runtime::Topic;
    ///
    /// let mut games = handle.subscribe(Topic::Game);
    /// while let Ok(event) = games.recv().await {
    ///     // Push the new state to connected clients
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
