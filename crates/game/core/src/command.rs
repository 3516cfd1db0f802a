//! Closed set of commands accepted by [`GameEngine`](crate::engine::GameEngine).

use crate::action::{
    Action, CompletePostTurnCommand, PlaceGeneralCommand, PlayerAction, SelectDeckCommand,
    SetupReinforcementsCommand,
};
use crate::state::PlayerId;

/// Every state-changing request, serialized with a `type` tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum Command {
    SelectDeck(SelectDeckCommand),
    PlaceGeneral(PlaceGeneralCommand),
    SetupReinforcements(SetupReinforcementsCommand),
    StartGame,
    Play(PlayerAction),
    CompletePostTurn(CompletePostTurnCommand),
}

impl Command {
    pub fn play(player: PlayerId, action: Action) -> Self {
        Command::Play(PlayerAction::new(player, action))
    }

    /// Player that issued the command; `None` for `startGame`.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Command::SelectDeck(command) => Some(command.player),
            Command::PlaceGeneral(command) => Some(command.player),
            Command::SetupReinforcements(command) => Some(command.player),
            Command::StartGame => None,
            Command::Play(command) => Some(command.player),
            Command::CompletePostTurn(command) => Some(command.player),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::SelectDeck(_) => "selectDeck",
            Command::PlaceGeneral(_) => "placeGeneral",
            Command::SetupReinforcements(_) => "setupReinforcements",
            Command::StartGame => "startGame",
            Command::Play(command) => command.action.as_str(),
            Command::CompletePostTurn(_) => "completePostTurn",
        }
    }
}
