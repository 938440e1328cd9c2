//! Board state, the setup interface, and read-only queries.

use std::collections::HashMap;

use crate::zobrist::{BoardKey, ZobristKeys};

use super::{
    Bitboard, CastleSide, CastlingRights, Color, GameStatus, Move, Piece, Square,
};

/// Everything `undo_move` needs that reversing the placement alone cannot
/// recover: the labelled move itself plus the pre-move flags, counters,
/// and fingerprint.
#[derive(Clone, Debug)]
pub(crate) struct HistoryEntry {
    pub(crate) mv: Move,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) hash: BoardKey,
    pub(crate) fifty_move_counter: u32,
}

/// Occurrence counts per position fingerprint, for threefold-repetition
/// detection. Zero-count entries are removed outright.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<BoardKey, u32>,
}

impl RepetitionTable {
    fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: BoardKey) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: BoardKey, count: u32) {
        if count == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, count);
        }
    }

    pub(crate) fn increment(&mut self, key: BoardKey) -> u32 {
        let next = self.get(key).saturating_add(1);
        self.set(key, next);
        next
    }

    /// False when the key has no recorded occurrences, which on undo means
    /// the table and the board drifted apart.
    pub(crate) fn decrement(&mut self, key: BoardKey) -> bool {
        let count = self.get(key);
        if count == 0 {
            return false;
        }
        self.set(key, count - 1);
        true
    }

    fn clear(&mut self) {
        self.counts.clear();
    }
}

/// The board engine: authoritative position state with reversible move
/// execution.
///
/// Bitboards and a per-square array are kept in lockstep on every
/// mutation; the fingerprint is maintained purely incrementally and is
/// never recomputed from scratch. The engine is single-threaded and
/// exclusively owned by its caller; parallel searches clone independent
/// instances.
#[derive(Clone, Debug)]
pub struct Board {
    // pieces[color][piece]
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) squares: [Option<(Color, Piece)>; 64],
    pub(crate) turn: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    // castled[color][side]: set once a castle has actually been played.
    pub(crate) castled: [[bool; 2]; 2],
    pub(crate) fifty_move_counter: u32,
    pub(crate) game_status: GameStatus,
    pub(crate) hash: BoardKey,
    pub(crate) keys: Box<ZobristKeys>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) repetitions: RepetitionTable,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            board.add_piece(Square(0, file), Color::White, *piece);
            board.add_piece(Square(7, file), Color::Black, *piece);
            board.add_piece(Square(1, file), Color::White, Piece::Pawn);
            board.add_piece(Square(6, file), Color::Black, Piece::Pawn);
        }
        for color in Color::BOTH {
            board.set_castling_right(color, CastleSide::King, true);
            board.set_castling_right(color, CastleSide::Queen, true);
        }
        board
    }

    /// An empty board: no pieces, White to move, no castling rights, no
    /// en-passant window, empty history. Positions are then established
    /// through the setup calls below.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            squares: [None; 64],
            turn: Color::White,
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
            castled: [[false; 2]; 2],
            fifty_move_counter: 0,
            game_status: GameStatus::Pending,
            hash: BoardKey::default(),
            keys: ZobristKeys::new(),
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
        }
    }

    /// Remove all pieces and reset flags, counters, history, and the
    /// repetition table. The key table is kept.
    pub fn clear(&mut self) {
        self.pieces = [[Bitboard::EMPTY; 6]; 2];
        self.occupied = [Bitboard::EMPTY; 2];
        self.all_occupied = Bitboard::EMPTY;
        self.squares = [None; 64];
        self.turn = Color::White;
        self.en_passant_target = None;
        self.castling_rights = CastlingRights::none();
        self.castled = [[false; 2]; 2];
        self.fifty_move_counter = 0;
        self.game_status = GameStatus::Pending;
        self.hash = BoardKey::default();
        self.history.clear();
        self.repetitions.clear();
    }

    // ------------------------------------------------------------------
    // Setup interface (consumed by the game loader; also used internally
    // by move execution, which relies on these keeping the bitboards, the
    // square array, and the fingerprint in step).
    // ------------------------------------------------------------------

    /// Place a piece. Returns false if the square is invalid or occupied.
    pub fn add_piece(&mut self, square: Square, color: Color, piece: Piece) -> bool {
        if !square.is_valid() || self.squares[square.as_index()].is_some() {
            return false;
        }
        let bit = Bitboard::from_square(square);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
        self.squares[square.as_index()] = Some((color, piece));
        self.hash ^= self.keys.piece(piece, color, square);
        true
    }

    /// Remove whatever stands on a square. Returns false if the square is
    /// invalid or empty.
    pub fn remove_piece(&mut self, square: Square) -> bool {
        if !square.is_valid() {
            return false;
        }
        let Some((color, piece)) = self.squares[square.as_index()] else {
            return false;
        };
        let bit = Bitboard::from_square(square);
        self.pieces[color.index()][piece.index()] ^= bit;
        self.occupied[color.index()] ^= bit;
        self.all_occupied ^= bit;
        self.squares[square.as_index()] = None;
        self.hash ^= self.keys.piece(piece, color, square);
        true
    }

    /// Set the side to move. The turn key is toggled only on an actual
    /// transition.
    pub fn set_turn(&mut self, color: Color) {
        if self.turn != color {
            self.hash ^= self.keys.turn_key;
        }
        self.turn = color;
    }

    /// Grant or revoke one castling right, toggling its fingerprint key on
    /// actual transitions only.
    pub fn set_castling_right(&mut self, color: Color, side: CastleSide, value: bool) {
        if self.castling_rights.has(color, side) != value {
            self.hash ^= self.keys.castling(color, side);
        }
        if value {
            self.castling_rights.set(color, side);
        } else {
            self.castling_rights.remove(color, side);
        }
    }

    /// Arm the en-passant capture square. Out-of-range squares are ignored.
    pub fn set_en_passant(&mut self, square: Square) {
        if !square.is_valid() {
            return;
        }
        self.clear_en_passant();
        self.en_passant_target = Some(square);
        self.hash ^= self.keys.en_passant(square);
    }

    pub(crate) fn clear_en_passant(&mut self) {
        if let Some(old) = self.en_passant_target.take() {
            self.hash ^= self.keys.en_passant(old);
        }
    }

    pub fn set_game_status(&mut self, status: GameStatus) {
        self.game_status = status;
    }

    // ------------------------------------------------------------------
    // Queries (consumed by search and evaluation; all total).
    // ------------------------------------------------------------------

    /// The owner and kind on a square, or None for empty or out-of-range
    /// squares.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<(Color, Piece)> {
        if !square.is_valid() {
            return None;
        }
        self.squares[square.as_index()]
    }

    /// Occupancy of the whole board.
    #[inline]
    #[must_use]
    pub fn all_pieces(&self) -> Bitboard {
        self.all_occupied
    }

    /// Aggregate occupancy of one player.
    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    /// Occupancy of one player's pieces of one kind.
    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The current dual position fingerprint.
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> BoardKey {
        self.hash
    }

    #[must_use]
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights.has(color, side)
    }

    /// Whether this player has actually castled on this wing.
    #[must_use]
    pub fn is_castled(&self, color: Color, side: CastleSide) -> bool {
        self.castled[color.index()][side.index()]
    }

    #[must_use]
    pub fn is_en_passant_on(&self) -> bool {
        self.en_passant_target.is_some()
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Where this player's king starts the game; castling is only offered
    /// from here.
    #[must_use]
    pub fn initial_king_square(&self, color: Color) -> Square {
        match color {
            Color::White => Square(0, 4),
            Color::Black => Square(7, 4),
        }
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    #[must_use]
    pub fn fifty_move_counter(&self) -> u32 {
        self.fifty_move_counter
    }

    #[inline]
    #[must_use]
    pub fn game_status(&self) -> GameStatus {
        self.game_status
    }

    /// Full-move number: half the history length, rounded up.
    #[must_use]
    pub fn move_number(&self) -> usize {
        (self.history.len() + 1) / 2
    }

    /// How many times the current position has been reached by a committed
    /// move during this game.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(self.hash)
    }

    pub(crate) fn king_square(&self, color: Color) -> Option<Square> {
        let bb = self.pieces_of(color, Piece::King);
        if bb.is_empty() {
            None
        } else {
            Some(Square::from_index(bb.0.trailing_zeros() as usize))
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
