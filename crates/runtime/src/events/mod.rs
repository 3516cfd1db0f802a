//! Topic-based event bus for runtime events.
//!
//! Game workers publish to the bus only after a command has been persisted,
//! so subscribers never observe a state that failed to commit. Rejected
//! commands are answered to their caller and never broadcast.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{GameEvent, LifecycleEvent};
