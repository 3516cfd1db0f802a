use crate::config::GameConfig;
use crate::state::{BoardPiece, PieceId, PieceKind, PlayerId, Position, StateError};

const SIZE: usize = GameConfig::BOARD_SIZE;

/// The 8x8 grid. Each cell holds at most one piece and every stored piece
/// records the cell it occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [[Option<BoardPiece>; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(position: Position) -> Option<(usize, usize)> {
        position
            .is_on_board()
            .then_some((position.row as usize, position.col as usize))
    }

    pub fn get(&self, position: Position) -> Option<&BoardPiece> {
        let (row, col) = Self::index(position)?;
        self.cells[row][col].as_ref()
    }

    /// True when the cell exists and holds no piece.
    pub fn is_free(&self, position: Position) -> bool {
        Self::index(position).is_some_and(|(row, col)| self.cells[row][col].is_none())
    }

    /// Places a piece on the cell recorded in `piece.position`.
    pub fn place(&mut self, piece: BoardPiece) -> Result<(), StateError> {
        let position = piece.position;
        let (row, col) = Self::index(position).ok_or(StateError::PositionOutOfBounds { position })?;
        if let Some(occupant) = &self.cells[row][col] {
            return Err(StateError::PositionOccupied {
                position,
                occupant: occupant.id,
            });
        }
        self.cells[row][col] = Some(piece);
        Ok(())
    }

    pub fn take(&mut self, position: Position) -> Option<BoardPiece> {
        let (row, col) = Self::index(position)?;
        self.cells[row][col].take()
    }

    /// Moves the piece at `from` to the free cell `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<(), StateError> {
        if !self.is_free(to) {
            return match self.get(to) {
                Some(occupant) => Err(StateError::PositionOccupied {
                    position: to,
                    occupant: occupant.id,
                }),
                None => Err(StateError::PositionOutOfBounds { position: to }),
            };
        }
        let mut piece = self
            .take(from)
            .ok_or(StateError::EmptyCell { position: from })?;
        piece.position = to;
        self.place(piece)
    }

    pub fn find(&self, id: PieceId) -> Option<&BoardPiece> {
        self.pieces().find(|piece| piece.id == id)
    }

    pub fn find_mut(&mut self, id: PieceId) -> Option<&mut BoardPiece> {
        self.cells
            .iter_mut()
            .flatten()
            .filter_map(Option::as_mut)
            .find(|piece| piece.id == id)
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &BoardPiece> {
        self.cells.iter().flatten().filter_map(Option::as_ref)
    }

    /// Pieces standing on columns 0..=6.
    pub fn active_pieces(&self) -> impl Iterator<Item = &BoardPiece> {
        self.pieces().filter(|piece| piece.position.is_active_field())
    }

    pub fn active_pieces_of(&self, owner: PlayerId) -> impl Iterator<Item = &BoardPiece> {
        self.active_pieces().filter(move |piece| piece.owner == owner)
    }

    /// Column-7 pieces of `owner`, nearest to its deployment row first.
    pub fn queued_pieces_of(&self, owner: PlayerId) -> Vec<Position> {
        let mut cells: Vec<Position> = self
            .pieces()
            .filter(|piece| piece.owner == owner && piece.in_reinforcement_column())
            .map(|piece| piece.position)
            .collect();
        let deployment_row = owner.deployment_row();
        cells.sort_by_key(|cell| (cell.row - deployment_row).abs());
        cells
    }

    pub fn general_of(&self, owner: PlayerId) -> Option<&BoardPiece> {
        self.pieces()
            .find(|piece| piece.owner == owner && piece.kind == PieceKind::General)
    }

    /// True when `owner`'s opponent has a piece on `row` (columns 0..=6).
    pub fn enemy_on_row(&self, owner: PlayerId, row: i32) -> bool {
        self.active_pieces()
            .any(|piece| piece.owner != owner && piece.position.row == row)
    }

    /// Iterates `(cell, occupant)` pairs, including empty cells.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&BoardPiece>)> {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, cell)| (Position::new(row as i32, col as i32), cell.as_ref()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scout(id: u32, owner: PlayerId, position: Position) -> BoardPiece {
        BoardPiece::deployed(PieceId(id), PieceKind::Scout, owner, position)
    }

    #[test]
    fn place_rejects_occupied_and_out_of_bounds_cells() {
        let mut board = Board::new();
        board
            .place(scout(1, PlayerId::Player1, Position::new(2, 2)))
            .unwrap();

        assert_eq!(
            board.place(scout(2, PlayerId::Player1, Position::new(2, 2))),
            Err(StateError::PositionOccupied {
                position: Position::new(2, 2),
                occupant: PieceId(1),
            })
        );
        assert!(matches!(
            board.place(scout(3, PlayerId::Player1, Position::new(8, 0))),
            Err(StateError::PositionOutOfBounds { .. })
        ));
    }

    #[test]
    fn relocate_updates_recorded_position() {
        let mut board = Board::new();
        board
            .place(scout(1, PlayerId::Player2, Position::new(0, 0)))
            .unwrap();
        board.relocate(Position::new(0, 0), Position::new(1, 1)).unwrap();

        assert!(board.is_free(Position::new(0, 0)));
        assert_eq!(board.find(PieceId(1)).unwrap().position, Position::new(1, 1));
    }

    #[test]
    fn queued_pieces_sorted_nearest_first() {
        let mut board = Board::new();
        for (id, row) in [(1, 4), (2, 7), (3, 5)] {
            board
                .place(scout(id, PlayerId::Player1, Position::new(row, 7)))
                .unwrap();
        }
        let rows: Vec<_> = board
            .queued_pieces_of(PlayerId::Player1)
            .into_iter()
            .map(|cell| cell.row)
            .collect();
        assert_eq!(rows, vec![7, 5, 4]);
    }

    #[test]
    fn enemy_on_row_ignores_reinforcement_column() {
        let mut board = Board::new();
        board
            .place(scout(1, PlayerId::Player2, Position::new(7, 7)))
            .unwrap();
        assert!(!board.enemy_on_row(PlayerId::Player1, 7));
        board
            .place(scout(2, PlayerId::Player2, Position::new(7, 1)))
            .unwrap();
        assert!(board.enemy_on_row(PlayerId::Player1, 7));
    }
}
