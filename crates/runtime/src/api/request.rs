//! Raw action requests and their validation.
//!
//! Transports receive actions as loosely typed documents: a `type` string plus
//! whichever fields the sender filled in. [`ActionRequest`] mirrors that shape
//! and converts into the closed [`Action`] enum, reporting every missing or
//! invalid field at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vanguard_core::{
    Ability, Action, AddToReinforcementsAction, AttackAction, DeployAction, MoveAction, PieceId,
    Position, UseAbilityAction,
};

/// Loosely typed action document as sent by clients.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub piece_id: Option<u32>,
    /// Informational; the engine reads the origin from the board.
    pub from: Option<Position>,
    pub to: Option<Position>,
    pub target_piece_id: Option<u32>,
    pub reserve_piece_id: Option<u32>,
    pub ability_name: Option<String>,
}

/// One rejected field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a request, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn missing(&mut self, field: &'static str) {
        self.errors.push(FieldError {
            field,
            message: "is required".into(),
        });
    }

    fn invalid(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid request: ")?;
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn required<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        errors.missing(field);
    }
    value
}

impl TryFrom<ActionRequest> for Action {
    type Error = ValidationErrors;

    fn try_from(request: ActionRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();

        let Some(kind) = request.kind.as_deref() else {
            errors.missing("type");
            return Err(errors);
        };

        let piece_id = || request.piece_id.map(PieceId);

        let action = match kind {
            "move" => {
                let piece = required(&mut errors, "pieceId", piece_id());
                let to = required(&mut errors, "to", request.to);
                piece.zip(to).map(|(piece, to)| Action::Move(MoveAction::new(piece, to)))
            }
            "attack" => {
                let piece = required(&mut errors, "pieceId", piece_id());
                let target = required(
                    &mut errors,
                    "targetPieceId",
                    request.target_piece_id.map(PieceId),
                );
                piece
                    .zip(target)
                    .map(|(piece, target)| Action::Attack(AttackAction::new(piece, target)))
            }
            "deployFromReinforcements" => {
                let piece = required(&mut errors, "pieceId", piece_id());
                let to = required(&mut errors, "to", request.to);
                piece.zip(to).map(|(piece, to)| {
                    Action::DeployFromReinforcements(DeployAction::new(piece, to))
                })
            }
            "addToReinforcements" => {
                // Older clients send the reserve piece as `pieceId`.
                let piece = request
                    .reserve_piece_id
                    .or(request.piece_id)
                    .map(PieceId);
                required(&mut errors, "reservePieceId", piece).map(|piece| {
                    Action::AddToReinforcements(AddToReinforcementsAction::new(piece))
                })
            }
            "useAbility" => {
                let piece = required(&mut errors, "pieceId", piece_id());
                let ability = match request.ability_name.as_deref() {
                    None => {
                        errors.missing("abilityName");
                        None
                    }
                    Some(name) => match Ability::from_str(name) {
                        Ok(ability) => Some(ability),
                        Err(_) => {
                            errors.invalid("abilityName", format!("unknown ability '{}'", name));
                            None
                        }
                    },
                };
                piece.zip(ability).map(|(piece, ability)| {
                    Action::UseAbility(UseAbilityAction::new(piece, ability))
                })
            }
            "endTurn" => Some(Action::EndTurn),
            other => {
                errors.invalid("type", format!("unknown action '{}'", other));
                None
            }
        };

        match action {
            Some(action) if errors.is_empty() => Ok(action),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: &str) -> ActionRequest {
        ActionRequest {
            kind: Some(kind.into()),
            ..ActionRequest::default()
        }
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = Action::try_from(request("move")).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["pieceId", "to"]);
    }

    #[test]
    fn missing_type_is_rejected() {
        let errors = Action::try_from(ActionRequest::default()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["type"]);
    }

    #[test]
    fn unknown_ability_names_are_invalid() {
        let mut req = request("useAbility");
        req.piece_id = Some(3);
        req.ability_name = Some("Teleport".into());

        let errors = Action::try_from(req).unwrap_err();
        assert_eq!(errors.errors[0].field, "abilityName");
        assert!(errors.to_string().contains("unknown ability 'Teleport'"));
    }

    #[test]
    fn parses_complete_requests() {
        let mut req = request("attack");
        req.piece_id = Some(1);
        req.target_piece_id = Some(2);
        assert_eq!(
            Action::try_from(req).unwrap(),
            Action::Attack(AttackAction::new(PieceId(1), PieceId(2)))
        );

        let mut req = request("useAbility");
        req.piece_id = Some(5);
        req.ability_name = Some("En avant!".into());
        assert_eq!(
            Action::try_from(req).unwrap(),
            Action::UseAbility(UseAbilityAction::new(PieceId(5), Ability::EnAvant))
        );

        assert_eq!(Action::try_from(request("endTurn")).unwrap(), Action::EndTurn);
    }

    #[test]
    fn accepts_wire_documents() {
        let req: ActionRequest = serde_json::from_str(
            r#"{"type":"deployFromReinforcements","pieceId":9,"to":{"row":7,"col":2}}"#,
        )
        .unwrap();
        assert_eq!(
            Action::try_from(req).unwrap(),
            Action::DeployFromReinforcements(DeployAction::new(PieceId(9), Position::new(7, 2)))
        );
    }
}
