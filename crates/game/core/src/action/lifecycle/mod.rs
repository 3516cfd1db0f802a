//! Commands that drive the game through its phases outside of in-turn play.

mod deck;
mod post_turn;
mod setup;
mod start;

pub use deck::SelectDeckCommand;
pub use post_turn::{CompletePostTurnCommand, TurnChange};
pub use setup::{PlaceGeneralCommand, SetupReinforcementsCommand};
pub use start::{StartGameCommand, StartOutcome};
