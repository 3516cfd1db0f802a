use crate::action::{ActionError, ActionTransition, require_phase};
use crate::config::GameConfig;
use crate::engine::economy;
use crate::state::{GameState, Phase, PieceId, Position};

/// Leaves setup: fills in missing generals, resolves the attacker's opening
/// step and hands the first turn to the defender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartGameCommand;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StartOutcome {
    /// Generals put on their fallback cells.
    pub auto_placed: Vec<PieceId>,
    /// Where the attacker's general ended up, if it could step forward.
    pub general_advanced_to: Option<Position>,
}

impl ActionTransition for StartGameCommand {
    type Error = ActionError;
    type Result = StartOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        require_phase(state.phase, Phase::Setup)?;
        for player in state.players.iter() {
            if player.reinforcements.len() != GameConfig::QUEUE_SIZE {
                return Err(ActionError::SetupIncomplete {
                    player: player.id,
                    queued: player.reinforcements.len(),
                    required: GameConfig::QUEUE_SIZE,
                });
            }
            if state.board.general_of(player.id).is_none() {
                player
                    .reserve_general()
                    .ok_or(ActionError::GeneralMissing(player.id))?;
                let fallback = player.id.fallback_general();
                if !state.board.is_free(fallback) {
                    return Err(ActionError::Occupied(fallback));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let auto_placed = economy::auto_place_generals(state)?;
        let general_advanced_to = economy::advance_attacker_general(state);

        state.phase = Phase::Playing;
        state.turn_number = 1;
        state.current_player = state.defender();
        economy::begin_turn(state);

        Ok(StartOutcome {
            auto_placed,
            general_advanced_to,
        })
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state.check_invariants()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SetupReinforcementsCommand;
    use crate::state::{PieceKind, PlayerId};
    use crate::testing::{configure_queues, pos, setup_state};

    #[test]
    fn requires_full_queues() {
        let mut state = setup_state(PlayerId::Player1);
        let picks = state.player(PlayerId::Player1).reserve[1..5]
            .iter()
            .map(|p| p.id)
            .collect();
        SetupReinforcementsCommand::new(PlayerId::Player1, picks)
            .apply(&mut state)
            .unwrap();

        assert_eq!(
            StartGameCommand.pre_validate(&state),
            Err(ActionError::SetupIncomplete {
                player: PlayerId::Player2,
                queued: 0,
                required: 4,
            })
        );
    }

    #[test]
    fn auto_places_and_advances_attacker() {
        let mut state = setup_state(PlayerId::Player2);
        configure_queues(&mut state);

        StartGameCommand.pre_validate(&state).unwrap();
        let outcome = StartGameCommand.apply(&mut state).unwrap();
        StartGameCommand.post_validate(&state).unwrap();

        assert_eq!(outcome.auto_placed.len(), 2);
        // Player2 attacks: its general leaves (0, 3) for (1, 3).
        assert_eq!(outcome.general_advanced_to, Some(pos(1, 3)));
        let p1_general = state.board.general_of(PlayerId::Player1).unwrap();
        assert_eq!(p1_general.position, pos(7, 3));
        assert_eq!(p1_general.kind, PieceKind::General);

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_player, PlayerId::Player1);
        assert_eq!(state.player(PlayerId::Player1).action_points, 2);
        assert!(state.player(PlayerId::Player2).general_advanced);
    }

    #[test]
    fn not_before_setup() {
        let state = crate::state::GameState::new(crate::state::GameId::new("g"), PlayerId::Player1);
        assert_eq!(
            StartGameCommand.pre_validate(&state),
            Err(ActionError::WrongPhase {
                actual: Phase::DeckSelection
            })
        );
    }
}
