//! Reversible move execution.
//!
//! `make_move` runs a small state machine: validate, classify, snapshot,
//! tentatively apply, then either commit (flags, fingerprint, history,
//! repetition table, turn) or roll back to the exact pre-attempt state.
//! `undo_move` strictly reverses the most recent commit; search backtracks
//! by pairing every make with an undo, so a probe must leave zero net
//! state drift.

use super::attack_tables::PAWN_SIDES;
use super::patterns;
use super::{
    Bitboard, Board, CastleSide, Color, HistoryEntry, Move, MoveError, MoveKind, MoveOutcome,
    Piece, Square,
};

/// Quiet half-moves after which the fifty-move rule draws the game.
const FIFTY_MOVE_LIMIT: u32 = 50;

impl Board {
    /// Validate and apply a candidate move.
    ///
    /// On success the move has been committed and labelled in place: its
    /// classification, moving piece, captured piece, and check annotation
    /// are filled in. `Ok(MoveOutcome::DrawByRepetition)` still commits;
    /// the draw is detected, not prevented. On `Err` the board is exactly
    /// as it was before the call.
    ///
    /// `trusted` skips the ownership and movement-pattern checks for
    /// callers (the search) that only ever submit moves they generated
    /// from this board's own candidate masks.
    pub fn make_move(&mut self, mv: &mut Move, trusted: bool) -> Result<MoveOutcome, MoveError> {
        let Some((owner, piece)) = self.piece_at(mv.from) else {
            return Err(MoveError::NoPieceInSquare);
        };
        mv.set_moving_piece(piece);

        let destination = self.piece_at(mv.to);
        if let Some((dest_owner, dest_piece)) = destination {
            if dest_owner != owner {
                mv.set_captured_piece(dest_piece);
            }
        }

        if !trusted {
            if owner != self.turn {
                return Err(MoveError::OpponentsTurn);
            }
            if !patterns::candidate_moves(piece, mv.from, owner, self).contains(mv.to) {
                return Err(MoveError::WrongMovement);
            }
        } else if matches!(destination, Some((dest_owner, _)) if dest_owner == owner) {
            // A trusted move onto an own piece would corrupt the undo
            // record; refuse it instead.
            return Err(MoveError::WrongMovement);
        }

        mv.set_kind(self.classify(mv.from, mv.to, owner, piece, destination.is_some()));

        self.history.push(HistoryEntry {
            mv: *mv,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            hash: self.hash,
            fifty_move_counter: self.fifty_move_counter,
        });

        // Tentative placement.
        self.remove_piece(mv.from);
        self.remove_piece(mv.to);
        self.add_piece(mv.to, owner, piece);
        if mv.kind() == MoveKind::EnPassantCapture {
            self.remove_piece(en_passant_victim(mv.to, owner));
        }

        // A pseudo-legal move may still expose the mover's own king; if it
        // does, reverse the placement exactly and report failure.
        let exposed = match self.king_square(owner) {
            Some(king) => !self.attacks_to(king, true).is_empty(),
            None => false,
        };
        if exposed {
            self.remove_piece(mv.to);
            self.add_piece(mv.from, owner, piece);
            if let Some((dest_owner, dest_piece)) = destination {
                self.add_piece(mv.to, dest_owner, dest_piece);
            }
            if mv.kind() == MoveKind::EnPassantCapture {
                self.add_piece(en_passant_victim(mv.to, owner), owner.opposite(), Piece::Pawn);
            }
            self.history.pop();
            return Err(MoveError::KingLeftInCheck);
        }

        // Commit.
        self.update_en_passant(mv, owner, piece);
        self.update_castling(mv, owner, piece);
        if mv.kind() == MoveKind::Promotion {
            // Always the strongest piece; the caller gets no say.
            self.remove_piece(mv.to);
            self.add_piece(mv.to, owner, Piece::Queen);
        }
        self.flip_turn();
        if self.is_king_in_check() {
            mv.set_check(true);
        }

        if piece == Piece::Pawn || mv.is_capture() {
            self.fifty_move_counter = 0;
        } else {
            self.fifty_move_counter += 1;
        }

        let seen = self.repetitions.increment(self.hash);
        if seen >= 3 || self.fifty_move_counter >= FIFTY_MOVE_LIMIT {
            #[cfg(feature = "logging")]
            log::debug!(
                "draw after {mv}: seen {seen} times, {} quiet half-moves",
                self.fifty_move_counter
            );
            return Ok(MoveOutcome::DrawByRepetition);
        }
        Ok(MoveOutcome::Played)
    }

    /// Reverse the most recently committed move.
    ///
    /// Returns false if there is nothing to undo, or if an expected piece
    /// is missing mid-reversal; the latter means the caller broke the
    /// make/undo pairing contract and the board can no longer be trusted.
    pub fn undo_move(&mut self) -> bool {
        let Some(entry) = self.history.last().cloned() else {
            return false;
        };
        if !self.repetitions.decrement(self.hash) {
            #[cfg(feature = "logging")]
            log::warn!("undo: current position missing from the repetition table");
            return false;
        }

        self.flip_turn();
        let mover = self.turn;
        let mv = entry.mv;
        let Some(piece) = mv.moving_piece() else {
            return false;
        };

        if !self.remove_piece(mv.to) {
            return false;
        }
        if !self.add_piece(mv.from, mover, piece) {
            return false;
        }

        let restored = match mv.kind() {
            MoveKind::Simple => true,
            MoveKind::Capture => match mv.captured_piece() {
                Some(captured) => self.add_piece(mv.to, mover.opposite(), captured),
                None => false,
            },
            MoveKind::EnPassantCapture => self.add_piece(
                en_passant_victim(mv.to, mover),
                mover.opposite(),
                Piece::Pawn,
            ),
            MoveKind::CastleKingSide => {
                self.castled[mover.index()][CastleSide::King.index()] = false;
                let rank = mv.to.rank();
                self.remove_piece(Square(rank, 5))
                    && self.add_piece(Square(rank, 7), mover, Piece::Rook)
            }
            MoveKind::CastleQueenSide => {
                self.castled[mover.index()][CastleSide::Queen.index()] = false;
                let rank = mv.to.rank();
                self.remove_piece(Square(rank, 3))
                    && self.add_piece(Square(rank, 0), mover, Piece::Rook)
            }
            MoveKind::Promotion => {
                // A capturing promotion changes file; put the victim back.
                if mv.from.file() != mv.to.file() {
                    match mv.captured_piece() {
                        Some(captured) => self.add_piece(mv.to, mover.opposite(), captured),
                        None => false,
                    }
                } else {
                    true
                }
            }
        };
        if !restored {
            return false;
        }

        // Flags, counters, and the fingerprint come back verbatim from the
        // snapshot rather than being recomputed.
        self.castling_rights = entry.castling_rights;
        self.en_passant_target = entry.en_passant_target;
        self.fifty_move_counter = entry.fifty_move_counter;
        self.hash = entry.hash;
        self.history.pop();
        true
    }

    fn classify(
        &self,
        from: Square,
        to: Square,
        owner: Color,
        piece: Piece,
        captures: bool,
    ) -> MoveKind {
        let mut kind = if captures {
            MoveKind::Capture
        } else if piece == Piece::Pawn && self.en_passant_target == Some(to) {
            MoveKind::EnPassantCapture
        } else if piece == Piece::King
            && from == self.initial_king_square(owner)
            && from.rank() == to.rank()
            && to.file() == from.file() + 2
        {
            MoveKind::CastleKingSide
        } else if piece == Piece::King
            && from == self.initial_king_square(owner)
            && from.rank() == to.rank()
            && from.file() == to.file() + 2
        {
            MoveKind::CastleQueenSide
        } else {
            MoveKind::Simple
        };

        // Promotions can happen both as simple moves and as captures.
        let promotion_rank = if owner == Color::White { 7 } else { 0 };
        if piece == Piece::Pawn && to.rank() == promotion_rank {
            kind = MoveKind::Promotion;
        }
        kind
    }

    /// The en-passant window closes every half-move; it is re-armed only
    /// when a pawn advanced two squares and an enemy pawn stands beside
    /// the landing square, ready to flank.
    fn update_en_passant(&mut self, mv: &Move, owner: Color, piece: Piece) {
        self.clear_en_passant();
        if piece != Piece::Pawn {
            return;
        }
        let from_rank = mv.from.rank() as isize;
        let to_rank = mv.to.rank() as isize;
        if (from_rank - to_rank).abs() != 2 {
            return;
        }
        let flankers =
            Bitboard(PAWN_SIDES[mv.to.as_index()]) & self.pieces_of(owner.opposite(), Piece::Pawn);
        if flankers.is_empty() {
            return;
        }
        self.set_en_passant(Square(usize::midpoint(mv.from.rank(), mv.to.rank()), mv.from.file()));
    }

    /// Castling rights die the first time the king moves at all, or any
    /// piece moves away from or onto a rook corner. On an actual castle
    /// the rook is relocated here as well.
    fn update_castling(&mut self, mv: &Move, owner: Color, piece: Piece) {
        if piece == Piece::King {
            match mv.kind() {
                MoveKind::CastleKingSide => {
                    let rank = mv.to.rank();
                    self.remove_piece(Square(rank, 7));
                    self.add_piece(Square(rank, 5), owner, Piece::Rook);
                    self.castled[owner.index()][CastleSide::King.index()] = true;
                }
                MoveKind::CastleQueenSide => {
                    let rank = mv.to.rank();
                    self.remove_piece(Square(rank, 0));
                    self.add_piece(Square(rank, 3), owner, Piece::Rook);
                    self.castled[owner.index()][CastleSide::Queen.index()] = true;
                }
                _ => {}
            }
            self.set_castling_right(owner, CastleSide::King, false);
            self.set_castling_right(owner, CastleSide::Queen, false);
        }

        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                let corner = rook_corner(color, side);
                if mv.from == corner || mv.to == corner {
                    self.set_castling_right(color, side, false);
                }
            }
        }
    }

    pub(crate) fn flip_turn(&mut self) {
        self.turn = self.turn.opposite();
        self.hash ^= self.keys.turn_key;
    }
}

/// Where the pawn captured en passant actually stands: one rank behind the
/// capture square from the mover's point of view.
fn en_passant_victim(to: Square, mover: Color) -> Square {
    if mover == Color::White {
        Square(to.rank() - 1, to.file())
    } else {
        Square(to.rank() + 1, to.file())
    }
}

fn rook_corner(color: Color, side: CastleSide) -> Square {
    let rank = if color == Color::White { 0 } else { 7 };
    let file = if side == CastleSide::King { 7 } else { 0 };
    Square(rank, file)
}
