mod common;
mod piece;
mod player;

pub use common::{GameId, PieceId, PlayerId, Position, Role};
pub use piece::{AbilityCharges, Ability, BoardPiece, PieceKind, ReinforcementPiece, ReservePiece};
pub use player::{PlayerState, Players};
