use std::fmt;

use crate::config::GameConfig;

/// Unique identifier for a piece, stable for the whole game.
///
/// Identifiers are allocated sequentially by [`GameState`](crate::state::GameState)
/// and never reused, even after the piece is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a stored game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board cell in (row, col) coordinates. Row 0 is player2's back edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns this position shifted by the given deltas.
    pub const fn translate(self, drow: i32, dcol: i32) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }

    pub const fn is_on_board(self) -> bool {
        let size = GameConfig::BOARD_SIZE as i32;
        self.row >= 0 && self.row < size && self.col >= 0 && self.col < size
    }

    /// True for cells in columns 0..=6, where pieces move and fight.
    pub const fn is_active_field(self) -> bool {
        self.is_on_board() && self.col < GameConfig::REINFORCEMENT_COL
    }

    pub const fn is_reinforcement_column(self) -> bool {
        self.is_on_board() && self.col == GameConfig::REINFORCEMENT_COL
    }

    /// Index into a row-major 8x8 bitboard, `None` when off the board.
    pub const fn bit_index(self) -> Option<u32> {
        if self.is_on_board() {
            Some((self.row as u32) * GameConfig::BOARD_SIZE as u32 + self.col as u32)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Seat at the table. Serialized as `"player1"` / `"player2"`.
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
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];

    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    /// Edge row where this player's reinforcements enter the field.
    pub const fn deployment_row(self) -> i32 {
        match self {
            Self::Player1 => GameConfig::BOARD_SIZE as i32 - 1,
            Self::Player2 => 0,
        }
    }

    /// Row delta that moves a piece toward the opponent's edge.
    pub const fn forward(self) -> i32 {
        match self {
            Self::Player1 => -1,
            Self::Player2 => 1,
        }
    }

    /// Row delta that moves a queued piece toward the deployment row.
    pub const fn toward_deployment(self) -> i32 {
        -self.forward()
    }

    /// Column-7 cell of queue slot `index`; slot 0 sits on the deployment row.
    pub const fn reinforcement_slot(self, index: usize) -> Position {
        let row = self.deployment_row() + self.forward() * index as i32;
        Position::new(row, GameConfig::REINFORCEMENT_COL)
    }

    /// Slot farthest from the deployment row; new queue entries land here.
    pub const fn tail_slot(self) -> Position {
        self.reinforcement_slot(GameConfig::QUEUE_SIZE - 1)
    }

    /// True when `row` lies in this player's half of the board.
    pub const fn owns_row(self, row: i32) -> bool {
        let half = GameConfig::BOARD_SIZE as i32 / 2;
        match self {
            Self::Player1 => row >= half && row < GameConfig::BOARD_SIZE as i32,
            Self::Player2 => row >= 0 && row < half,
        }
    }

    pub const fn fallback_general(self) -> Position {
        match self {
            Self::Player1 => GameConfig::PLAYER1_FALLBACK_GENERAL,
            Self::Player2 => GameConfig::PLAYER2_FALLBACK_GENERAL,
        }
    }
}

/// Asymmetric side, drawn at game creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Role {
    Attacker,
    Defender,
}
