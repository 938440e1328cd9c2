//! Fluent builder for constructing positions.
//!
//! Lets loaders and tests establish an arbitrary position piece by piece,
//! driving the same setup calls the engine exposes directly.
//!
//! # Example
//! ```
//! use chess_rules::board::{BoardBuilder, CastleSide, Color, Piece, Square};
//!
//! let board = BoardBuilder::new()
//!     .piece(Square(0, 4), Color::White, Piece::King)
//!     .piece(Square(0, 7), Color::White, Piece::Rook)
//!     .piece(Square(7, 4), Color::Black, Piece::King)
//!     .castling_right(Color::White, CastleSide::King)
//!     .side_to_move(Color::White)
//!     .build();
//! assert!(board.can_castle(Color::White, CastleSide::King));
//! ```

use super::{Board, CastleSide, Color, GameStatus, Piece, Square};

/// A fluent builder for `Board` positions.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    pieces: Vec<(Square, Color, Piece)>,
    side_to_move: Color,
    rights: Vec<(Color, CastleSide)>,
    en_passant_target: Option<Square>,
    game_status: GameStatus,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    /// Create a new empty board builder.
    #[must_use]
    pub fn new() -> Self {
        BoardBuilder {
            pieces: Vec::new(),
            side_to_move: Color::White,
            rights: Vec::new(),
            en_passant_target: None,
            game_status: GameStatus::Pending,
        }
    }

    /// Place a piece, replacing anything previously put on the square.
    #[must_use]
    pub fn piece(mut self, square: Square, color: Color, piece: Piece) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self.pieces.push((square, color, piece));
        self
    }

    /// Set the side to move.
    #[must_use]
    pub const fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    /// Grant one castling right.
    #[must_use]
    pub fn castling_right(mut self, color: Color, side: CastleSide) -> Self {
        self.rights.push((color, side));
        self
    }

    /// Grant all four castling rights.
    #[must_use]
    pub fn all_castling_rights(mut self) -> Self {
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                self.rights.push((color, side));
            }
        }
        self
    }

    /// Arm the en-passant capture square.
    #[must_use]
    pub const fn en_passant(mut self, target: Square) -> Self {
        self.en_passant_target = Some(target);
        self
    }

    /// Record the game status.
    #[must_use]
    pub const fn game_status(mut self, status: GameStatus) -> Self {
        self.game_status = status;
        self
    }

    /// Build the board through the engine's setup calls.
    #[must_use]
    pub fn build(self) -> Board {
        let mut board = Board::empty();
        for (square, color, piece) in self.pieces {
            board.add_piece(square, color, piece);
        }
        board.set_turn(self.side_to_move);
        for (color, side) in self.rights {
            board.set_castling_right(color, side, true);
        }
        if let Some(target) = self.en_passant_target {
            board.set_en_passant(target);
        }
        board.set_game_status(self.game_status);
        board
    }
}
