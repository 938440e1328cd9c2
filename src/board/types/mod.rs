//! Value types shared across the board engine.

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use bitboard::Bitboard;
pub use castling::{CastleSide, CastlingRights};
pub use moves::{Move, MoveKind};
pub use piece::{Color, Piece};
pub use square::Square;

/// Overall game state, as recorded by the position loader or front end.
/// The engine stores it for its callers but never transitions it on its
/// own; terminal conditions are the front end's call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    #[default]
    Pending,
    WhiteWins,
    BlackWins,
    Draw,
}
