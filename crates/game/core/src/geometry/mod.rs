//! Per-kind movement, attack and influence shapes.
//!
//! Shapes are fixed offset tables applied to a piece's cell. Targets are
//! filtered to the active field (columns 0..=6); pieces standing in the
//! reinforcement column have no movement or attack targets. Movement ignores
//! intervening pieces, so every shape is a set of jumps.

mod zone;

pub use zone::Zone;

use crate::state::{Board, BoardPiece, PieceKind, PlayerId, Position};

/// Row/column delta relative to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offset {
    pub drow: i32,
    pub dcol: i32,
}

const fn o(drow: i32, dcol: i32) -> Offset {
    Offset { drow, dcol }
}

impl Offset {
    pub const fn apply(self, origin: Position) -> Position {
        origin.translate(self.drow, self.dcol)
    }
}

pub const ORTHOGONAL: [Offset; 4] = [o(-1, 0), o(1, 0), o(0, -1), o(0, 1)];

pub const DIAGONAL: [Offset; 4] = [o(-1, -1), o(-1, 1), o(1, -1), o(1, 1)];

pub const ADJACENT: [Offset; 8] = [
    o(-1, -1),
    o(-1, 0),
    o(-1, 1),
    o(0, -1),
    o(0, 1),
    o(1, -1),
    o(1, 0),
    o(1, 1),
];

/// Manhattan distance 1 or 2.
pub const INFANTRY_MOVEMENT: [Offset; 12] = [
    o(-2, 0),
    o(-1, -1),
    o(-1, 0),
    o(-1, 1),
    o(0, -2),
    o(0, -1),
    o(0, 1),
    o(0, 2),
    o(1, -1),
    o(1, 0),
    o(1, 1),
    o(2, 0),
];

/// Adjacent cells plus the four diagonal two-step jumps.
pub const SCOUT_MOVEMENT: [Offset; 12] = [
    o(-2, -2),
    o(-2, 2),
    o(-1, -1),
    o(-1, 0),
    o(-1, 1),
    o(0, -1),
    o(0, 1),
    o(1, -1),
    o(1, 0),
    o(1, 1),
    o(2, -2),
    o(2, 2),
];

/// Manhattan distance 0..=2, the general's own cell included.
pub const GENERAL_INFLUENCE: [Offset; 13] = [
    o(-2, 0),
    o(-1, -1),
    o(-1, 0),
    o(-1, 1),
    o(0, -2),
    o(0, -1),
    o(0, 0),
    o(0, 1),
    o(0, 2),
    o(1, -1),
    o(1, 0),
    o(1, 1),
    o(2, 0),
];

/// The colonel's cell and its orthogonal neighbours.
pub const COLONEL_INFLUENCE: [Offset; 5] = [o(0, 0), o(-1, 0), o(1, 0), o(0, -1), o(0, 1)];

pub fn movement_offsets(kind: PieceKind) -> &'static [Offset] {
    match kind {
        PieceKind::General | PieceKind::Colonel => &ADJACENT,
        PieceKind::Infantryman => &INFANTRY_MOVEMENT,
        PieceKind::Scout => &SCOUT_MOVEMENT,
    }
}

pub fn attack_offsets(kind: PieceKind) -> &'static [Offset] {
    match kind {
        PieceKind::General | PieceKind::Colonel => &ORTHOGONAL,
        PieceKind::Infantryman => &ADJACENT,
        PieceKind::Scout => &DIAGONAL,
    }
}

/// Empty for pieces that project no influence.
pub fn influence_offsets(kind: PieceKind) -> &'static [Offset] {
    match kind {
        PieceKind::General => &GENERAL_INFLUENCE,
        PieceKind::Colonel => &COLONEL_INFLUENCE,
        PieceKind::Infantryman | PieceKind::Scout => &[],
    }
}

fn project(origin: Position, offsets: &[Offset]) -> impl Iterator<Item = Position> + '_ {
    offsets
        .iter()
        .map(move |offset| offset.apply(origin))
        .filter(|cell| cell.is_active_field())
}

/// True when `target` is one of the shape cells around `origin`, ignoring occupancy.
pub fn within(origin: Position, offsets: &[Offset], target: Position) -> bool {
    project(origin, offsets).any(|cell| cell == target)
}

/// Free active-field cells `piece` may move to.
pub fn movement_targets(board: &Board, piece: &BoardPiece) -> Zone {
    if piece.in_reinforcement_column() {
        return Zone::EMPTY;
    }
    project(piece.position, movement_offsets(piece.kind))
        .filter(|cell| board.is_free(*cell))
        .collect()
}

/// Active-field cells holding an enemy piece that `piece` may attack.
pub fn attack_targets(board: &Board, piece: &BoardPiece) -> Zone {
    if piece.in_reinforcement_column() {
        return Zone::EMPTY;
    }
    project(piece.position, attack_offsets(piece.kind))
        .filter(|cell| board.get(*cell).is_some_and(|other| other.owner != piece.owner))
        .collect()
}

/// Union of the influence shapes of `owner`'s generals and colonels on the active field.
pub fn allied_influence(board: &Board, owner: PlayerId) -> Zone {
    board
        .active_pieces_of(owner)
        .filter(|piece| piece.kind.is_high_rank())
        .flat_map(|piece| project(piece.position, influence_offsets(piece.kind)))
        .collect()
}
