//! Static piece catalogue: display names, categories and abilities.
//!
//! The catalogue is the single source for ability charge tables; the engine
//! reads it through [`PieceKind::initial_charges`](crate::state::PieceKind::initial_charges).

use crate::state::{Ability, PieceKind};

/// Broad grouping shown to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum PieceCategory {
    HighRank,
    Infantry,
    Scout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum AbilityType {
    Passive,
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AbilityDefinition {
    pub ability: Ability,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ability_type: AbilityType,
    pub description: &'static str,
    /// Uses granted on placement; `None` for passives.
    pub charges: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PieceDefinition {
    pub kind: PieceKind,
    pub name: &'static str,
    pub category: PieceCategory,
    pub abilities: &'static [AbilityDefinition],
}

const fn passive(ability: Ability, description: &'static str) -> AbilityDefinition {
    AbilityDefinition {
        ability,
        ability_type: AbilityType::Passive,
        description,
        charges: None,
    }
}

const fn active(ability: Ability, charges: u8, description: &'static str) -> AbilityDefinition {
    AbilityDefinition {
        ability,
        ability_type: AbilityType::Active,
        description,
        charges: Some(charges),
    }
}

const GENERAL_ABILITIES: &[AbilityDefinition] = &[
    passive(
        Ability::CommandementSupreme,
        "Octroie 2 points d'action supplémentaires au camp du général à chaque tour.",
    ),
    passive(
        Ability::ChairACanon,
        "Lorsqu'attaqué, une unité adjacente peut être sacrifiée à la place.",
    ),
    active(
        Ability::Parachutage,
        2,
        "Déploie une pièce depuis la réserve directement sur le plateau.",
    ),
    active(
        Ability::EnAvant,
        3,
        "Fait avancer une pièce alliée de 2 cases en avant.",
    ),
];

const COLONEL_ABILITIES: &[AbilityDefinition] = &[
    passive(
        Ability::RelaiDeCommandement,
        "Octroie 1 point d'action supplémentaire par tour.",
    ),
    active(
        Ability::RepliStrategique,
        1,
        "Permet de reculer n'importe quelle pièce de 2 cases.",
    ),
];

const INFANTRY_ABILITIES: &[AbilityDefinition] = &[active(
    Ability::Rage,
    3,
    "Après avoir détruit une pièce, réalise immédiatement un nouveau déplacement.",
)];

const SCOUT_ABILITIES: &[AbilityDefinition] = &[active(
    Ability::Adrenaline,
    3,
    "Autorise un second déplacement dans le même tour.",
)];

pub static CATALOG: [PieceDefinition; 4] = [
    PieceDefinition {
        kind: PieceKind::General,
        name: "Général",
        category: PieceCategory::HighRank,
        abilities: GENERAL_ABILITIES,
    },
    PieceDefinition {
        kind: PieceKind::Colonel,
        name: "Colonel",
        category: PieceCategory::HighRank,
        abilities: COLONEL_ABILITIES,
    },
    PieceDefinition {
        kind: PieceKind::Infantryman,
        name: "Fantassin",
        category: PieceCategory::Infantry,
        abilities: INFANTRY_ABILITIES,
    },
    PieceDefinition {
        kind: PieceKind::Scout,
        name: "Éclaireur",
        category: PieceCategory::Scout,
        abilities: SCOUT_ABILITIES,
    },
];

pub fn definition(kind: PieceKind) -> &'static PieceDefinition {
    match kind {
        PieceKind::General => &CATALOG[0],
        PieceKind::Colonel => &CATALOG[1],
        PieceKind::Infantryman => &CATALOG[2],
        PieceKind::Scout => &CATALOG[3],
    }
}
