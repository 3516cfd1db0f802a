use crate::state::Position;

/// Game configuration constants and tunable parameters.
///
/// The board dimensions and deck sizes are fixed by the rules; only the
/// fallback general cells are exposed as runtime data so tests and tools can
/// inspect them without hard-coding coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Cell where player1's general lands when it was never placed.
    pub player1_fallback_general: Position,
    /// Cell where player2's general lands when it was never placed.
    pub player2_fallback_general: Position,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Rows and columns of the square board.
    pub const BOARD_SIZE: usize = 8;
    /// Column reserved for the reinforcement queues.
    pub const REINFORCEMENT_COL: i32 = 7;
    /// Number of pieces a player picks during deck selection (general excluded).
    pub const DECK_SIZE: usize = 19;
    /// Reserve size after the general is prepended.
    pub const RESERVE_SIZE: usize = Self::DECK_SIZE + 1;
    /// Number of column-7 slots, and the exact queue length required by setup.
    pub const QUEUE_SIZE: usize = 4;
    /// Largest offset table (general influence).
    pub const MAX_ZONE_OFFSETS: usize = 13;

    pub const PLAYER1_FALLBACK_GENERAL: Position = Position::new(7, 3);
    pub const PLAYER2_FALLBACK_GENERAL: Position = Position::new(0, 3);

    pub fn new() -> Self {
        Self {
            player1_fallback_general: Self::PLAYER1_FALLBACK_GENERAL,
            player2_fallback_general: Self::PLAYER2_FALLBACK_GENERAL,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
