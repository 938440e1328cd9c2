//! Rules-and-state engine for a chess program.
//!
//! This crate owns the authoritative board configuration: it generates and
//! validates moves according to chess law, applies and reverses them with
//! full state recovery, and maintains an incrementally-updated position
//! fingerprint for threefold-repetition detection. Search, evaluation, and
//! any user-facing protocol are the consuming program's concern.

pub mod board;
pub mod zobrist;

pub use board::{
    Bitboard, Board, BoardBuilder, CastleSide, Color, GameStatus, Move, MoveError, MoveKind,
    MoveOutcome, Piece, Square,
};
pub use zobrist::BoardKey;
