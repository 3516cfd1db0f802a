//! Worker tasks that back the runtime orchestration.
//!
//! The dispatcher owns the registry of live games; each game gets its own
//! worker so commands for one game are serialized while different games run
//! in parallel.

mod dispatcher;
mod game;

pub(crate) use dispatcher::{Command, Dispatcher};
pub(crate) use game::GameMessage;
