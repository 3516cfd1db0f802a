//! Repository contract for persisting games and their history.

use vanguard_core::{GameId, GameState};

use super::error::Result;
use super::types::{ActionRecord, GameMetadata};

/// Store for game snapshots, metadata and the append-only action history.
///
/// Implementations are synchronous and shared between game workers; the
/// runtime guarantees that at most one worker writes a given game at a time,
/// so implementations only need to protect their own bookkeeping.
pub trait GameRepository: Send + Sync {
    /// Persists a freshly created game. Fails if the id is taken.
    fn create(&self, state: &GameState) -> Result<GameMetadata>;

    /// Loads the latest snapshot of a game.
    fn load(&self, id: &GameId) -> Result<Option<GameState>>;

    /// Replaces the latest snapshot and refreshes the metadata.
    fn save(&self, id: &GameId, state: &GameState) -> Result<()>;

    /// Appends one record to the game's history.
    fn append_history(&self, id: &GameId, record: &ActionRecord) -> Result<()>;

    /// Records an accepted command: history first, then the resulting snapshot.
    fn commit(&self, id: &GameId, record: &ActionRecord) -> Result<()> {
        self.append_history(id, record)?;
        self.save(id, &record.state_after)
    }

    /// Full history in append order.
    fn history(&self, id: &GameId) -> Result<Vec<ActionRecord>>;

    fn metadata(&self, id: &GameId) -> Result<Option<GameMetadata>>;

    /// Metadata of every stored game, oldest first.
    fn list(&self) -> Result<Vec<GameMetadata>>;

    /// Removes a game with its history. Returns whether it existed.
    fn delete(&self, id: &GameId) -> Result<bool>;

    fn exists(&self, id: &GameId) -> Result<bool> {
        Ok(self.metadata(id)?.is_some())
    }
}
