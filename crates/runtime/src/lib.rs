//! Async runtime for Vanguard games.
//!
//! This crate wires the deterministic engine from `vanguard-core` to storage
//! and transports. Consumers build a [`Runtime`], then drive any number of
//! games through the cloneable [`RuntimeHandle`] and follow committed states
//! on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`repository`] persists snapshots, metadata and action history
//! - `workers` keeps the dispatcher and per-game workers internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    ActionRequest, ErrorClass, FieldError, PieceZones, Result, RuntimeError, RuntimeHandle,
    ValidationErrors,
};
pub use events::{Event, EventBus, GameEvent, LifecycleEvent, Topic};
pub use repository::{
    ActionId, ActionRecord, FileGameRepository, GameMetadata, GameRepository,
    InMemoryGameRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, StorageConfig};
