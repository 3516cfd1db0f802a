use std::collections::BTreeMap;

use super::{PieceId, PlayerId, Position};
use crate::catalog;

/// Kind of a piece. Serialized in lowercase (`"infantryman"`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PieceKind {
    General,
    Colonel,
    Infantryman,
    Scout,
}

impl PieceKind {
    /// Generals and colonels project influence and grant action points.
    pub const fn is_high_rank(self) -> bool {
        matches!(self, Self::General | Self::Colonel)
    }

    /// Action points this piece contributes while on the active field.
    pub const fn command_points(self) -> u32 {
        match self {
            Self::General => 2,
            Self::Colonel => 1,
            Self::Infantryman | Self::Scout => 0,
        }
    }

    /// Full set of active-ability charges handed out when the piece is placed.
    pub fn initial_charges(self) -> AbilityCharges {
        catalog::definition(self)
            .abilities
            .iter()
            .filter_map(|def| def.charges.map(|charges| (def.ability, charges)))
            .collect()
    }
}

/// Named ability. The text form is the display name players see.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ability {
    #[strum(serialize = "Commandement suprême")]
    #[cfg_attr(feature = "serde", serde(rename = "Commandement suprême"))]
    CommandementSupreme,
    #[strum(serialize = "Chair à canon")]
    #[cfg_attr(feature = "serde", serde(rename = "Chair à canon"))]
    ChairACanon,
    Parachutage,
    #[strum(serialize = "En avant!")]
    #[cfg_attr(feature = "serde", serde(rename = "En avant!"))]
    EnAvant,
    #[strum(serialize = "Relai de commandement")]
    #[cfg_attr(feature = "serde", serde(rename = "Relai de commandement"))]
    RelaiDeCommandement,
    #[strum(serialize = "Repli stratégique")]
    #[cfg_attr(feature = "serde", serde(rename = "Repli stratégique"))]
    RepliStrategique,
    Rage,
    #[strum(serialize = "Adrénaline")]
    #[cfg_attr(feature = "serde", serde(rename = "Adrénaline"))]
    Adrenaline,
}

/// Remaining uses per active ability.
pub type AbilityCharges = BTreeMap<Ability, u8>;

/// Face-down piece waiting in a player's reserve.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReservePiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: PlayerId,
}

impl ReservePiece {
    pub fn new(id: PieceId, kind: PieceKind, owner: PlayerId) -> Self {
        Self { id, kind, owner }
    }
}

/// Entry of a reinforcement queue; `queue_position` 0 is the head.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReinforcementPiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub face_up: bool,
    pub queue_position: u32,
}

impl ReinforcementPiece {
    pub fn from_reserve(piece: ReservePiece, queue_position: u32, face_up: bool) -> Self {
        Self {
            id: piece.id,
            kind: piece.kind,
            owner: piece.owner,
            face_up,
            queue_position,
        }
    }
}

/// Piece standing on a board cell, either on the active field or in column 7.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct BoardPiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub position: Position,
    pub face_up: bool,
    pub ability_charges: AbilityCharges,
}

impl BoardPiece {
    /// A piece entering the active field: revealed, with fresh charges.
    pub fn deployed(id: PieceId, kind: PieceKind, owner: PlayerId, position: Position) -> Self {
        Self {
            id,
            kind,
            owner,
            position,
            face_up: true,
            ability_charges: kind.initial_charges(),
        }
    }

    /// Column-7 mirror of a queue entry. Queued pieces carry no charges.
    pub fn queued(entry: &ReinforcementPiece, position: Position) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            owner: entry.owner,
            position,
            face_up: entry.face_up,
            ability_charges: AbilityCharges::new(),
        }
    }

    pub fn in_reinforcement_column(&self) -> bool {
        self.position.is_reinforcement_column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_tables_by_kind() {
        let general = PieceKind::General.initial_charges();
        assert_eq!(general.get(&Ability::Parachutage), Some(&2));
        assert_eq!(general.get(&Ability::EnAvant), Some(&3));
        assert_eq!(general.len(), 2);

        assert_eq!(
            PieceKind::Colonel.initial_charges().into_iter().collect::<Vec<_>>(),
            vec![(Ability::RepliStrategique, 1)]
        );
        assert_eq!(
            PieceKind::Infantryman.initial_charges().into_iter().collect::<Vec<_>>(),
            vec![(Ability::Rage, 3)]
        );
        assert_eq!(
            PieceKind::Scout.initial_charges().into_iter().collect::<Vec<_>>(),
            vec![(Ability::Adrenaline, 3)]
        );
    }

    #[test]
    fn ability_names_round_trip_through_text() {
        assert_eq!(Ability::EnAvant.to_string(), "En avant!");
        assert_eq!("Repli stratégique".parse::<Ability>(), Ok(Ability::RepliStrategique));
        assert!("Teleport".parse::<Ability>().is_err());
    }

    #[test]
    fn command_points_by_rank() {
        assert_eq!(PieceKind::General.command_points(), 2);
        assert_eq!(PieceKind::Colonel.command_points(), 1);
        assert_eq!(PieceKind::Scout.command_points(), 0);
        assert!(!PieceKind::Infantryman.is_high_rank());
    }
}
