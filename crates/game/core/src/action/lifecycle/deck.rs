use crate::action::{ActionError, ActionTransition, require_phase};
use crate::config::GameConfig;
use crate::state::{GameState, Phase, PieceKind, PlayerId, ReservePiece};

/// Fills a player's reserve with the chosen pieces plus the general.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectDeckCommand {
    pub player: PlayerId,
    pub pieces: Vec<PieceKind>,
}

impl SelectDeckCommand {
    pub fn new(player: PlayerId, pieces: Vec<PieceKind>) -> Self {
        Self { player, pieces }
    }
}

impl ActionTransition for SelectDeckCommand {
    type Error = ActionError;
    /// True once both decks are in and the game moved to setup.
    type Result = bool;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::DeckSelection)?;
        if state.player(self.player).deck_selected {
            return Err(ActionError::DeckAlreadySelected(self.player));
        }
        if self.pieces.len() != GameConfig::DECK_SIZE {
            return Err(ActionError::DeckSize {
                expected: GameConfig::DECK_SIZE,
                actual: self.pieces.len(),
            });
        }
        if self.pieces.contains(&PieceKind::General) {
            return Err(ActionError::GeneralInDeck);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let mut reserve = Vec::with_capacity(GameConfig::RESERVE_SIZE);
        for kind in core::iter::once(PieceKind::General).chain(self.pieces.iter().copied()) {
            let id = state.allocate_piece_id()?;
            reserve.push(ReservePiece::new(id, kind, self.player));
        }

        let player = state.player_mut(self.player);
        player.reserve = reserve;
        player.deck_selected = true;

        let ready = state.players.iter().all(|player| player.deck_selected);
        if ready {
            state.phase = Phase::Setup;
        }
        Ok(ready)
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}
