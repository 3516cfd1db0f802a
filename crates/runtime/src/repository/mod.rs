//! Repository layer for persisted games.
//!
//! Repositories hold the data that changes during play:
//! - the latest snapshot of every game
//! - per-game metadata used for listings
//! - the append-only action history used for replay
//!
//! Static rule data (piece catalogue, offsets) lives in `vanguard-core`.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileGameRepository;
pub use memory::InMemoryGameRepository;
pub use traits::GameRepository;
pub use types::{ActionId, ActionRecord, GameMetadata};
