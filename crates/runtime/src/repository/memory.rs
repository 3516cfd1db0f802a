//! In-memory GameRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use vanguard_core::{GameId, GameState};

use super::error::{RepositoryError, Result};
use super::traits::GameRepository;
use super::types::{ActionRecord, GameMetadata};

struct StoredGame {
    metadata: GameMetadata,
    state: GameState,
    history: Vec<ActionRecord>,
}

/// In-memory implementation of GameRepository.
///
/// Everything is lost when the process exits.
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<GameId, StoredGame>>,
}

impl InMemoryGameRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
        }
    }

    fn with_game_mut<T>(
        &self,
        id: &GameId,
        f: impl FnOnce(&mut StoredGame) -> T,
    ) -> Result<T> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let game = games
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(f(game))
    }
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRepository for InMemoryGameRepository {
    fn create(&self, state: &GameState) -> Result<GameMetadata> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if games.contains_key(&state.id) {
            return Err(RepositoryError::AlreadyExists(state.id.clone()));
        }

        let metadata = GameMetadata::new(state, Utc::now());
        games.insert(
            state.id.clone(),
            StoredGame {
                metadata: metadata.clone(),
                state: state.clone(),
                history: Vec::new(),
            },
        );
        Ok(metadata)
    }

    fn load(&self, id: &GameId) -> Result<Option<GameState>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(games.get(id).map(|game| game.state.clone()))
    }

    fn save(&self, id: &GameId, state: &GameState) -> Result<()> {
        self.with_game_mut(id, |game| {
            game.metadata.touch(state, Utc::now());
            game.state = state.clone();
        })
    }

    fn append_history(&self, id: &GameId, record: &ActionRecord) -> Result<()> {
        self.with_game_mut(id, |game| {
            game.history.push(record.clone());
            game.metadata.action_count = game.history.len() as u64;
        })
    }

    /// Applies history and snapshot under a single write lock.
    fn commit(&self, id: &GameId, record: &ActionRecord) -> Result<()> {
        self.with_game_mut(id, |game| {
            game.history.push(record.clone());
            game.metadata.action_count = game.history.len() as u64;
            game.metadata.touch(&record.state_after, record.timestamp);
            game.state = (*record.state_after).clone();
        })
    }

    fn history(&self, id: &GameId) -> Result<Vec<ActionRecord>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        games
            .get(id)
            .map(|game| game.history.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    fn metadata(&self, id: &GameId) -> Result<Option<GameMetadata>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(games.get(id).map(|game| game.metadata.clone()))
    }

    fn list(&self) -> Result<Vec<GameMetadata>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut list: Vec<GameMetadata> = games.values().map(|game| game.metadata.clone()).collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    fn delete(&self, id: &GameId) -> Result<bool> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(games.remove(id).is_some())
    }
}
