//! Zobrist hashing for chess positions.
//!
//! Maintains a pair of incrementally-updatable 64-bit accumulators: a
//! working hash plus an independently keyed lock. The lock rides along with
//! every update so that two distinct positions colliding on both halves is
//! vanishingly unlikely, which lets the repetition table trust fingerprint
//! equality.

use std::ops::BitXorAssign;

use rand::prelude::*;

use crate::board::{CastleSide, Color, Piece, Square};

/// Fixed seed, so every engine instance derives the same reproducible key
/// material without sharing any global state.
const KEY_SEED: u64 = 0x9D3C_5A2B_71E6_40F8;

/// Dual position fingerprint.
///
/// XOR is its own inverse, so applying the key for any fact about the
/// position toggles that fact in and out of the fingerprint; a sequence of
/// updates followed by the exact reverse sequence restores it bit for bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoardKey {
    pub key: u64,
    pub lock: u64,
}

impl BitXorAssign for BoardKey {
    #[inline]
    fn bitxor_assign(&mut self, rhs: BoardKey) {
        self.key ^= rhs.key;
        self.lock ^= rhs.lock;
    }
}

/// Random key table owned by one board instance.
#[derive(Clone, Debug)]
pub(crate) struct ZobristKeys {
    // piece_keys[piece][color][square]
    piece_keys: [[[BoardKey; 64]; 2]; 6],
    pub(crate) turn_key: BoardKey,
    // castling_keys[color][side]
    castling_keys: [[BoardKey; 2]; 2],
    // Only 16 squares can ever be armed for en passant, but indexing by
    // square avoids offset bookkeeping.
    en_passant_keys: [BoardKey; 64],
}

impl ZobristKeys {
    pub(crate) fn new() -> Box<Self> {
        let mut rng = StdRng::seed_from_u64(KEY_SEED);
        let mut keys = Box::new(ZobristKeys {
            piece_keys: [[[BoardKey::default(); 64]; 2]; 6],
            turn_key: BoardKey::default(),
            castling_keys: [[BoardKey::default(); 2]; 2],
            en_passant_keys: [BoardKey::default(); 64],
        });

        for piece in &mut keys.piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = next_key(&mut rng);
                }
            }
        }

        keys.turn_key = next_key(&mut rng);

        for color in &mut keys.castling_keys {
            for key in color.iter_mut() {
                *key = next_key(&mut rng);
            }
        }

        for key in &mut keys.en_passant_keys {
            *key = next_key(&mut rng);
        }

        keys
    }

    #[inline]
    pub(crate) fn piece(&self, piece: Piece, color: Color, square: Square) -> BoardKey {
        self.piece_keys[piece.index()][color.index()][square.as_index()]
    }

    #[inline]
    pub(crate) fn castling(&self, color: Color, side: CastleSide) -> BoardKey {
        self.castling_keys[color.index()][side.index()]
    }

    #[inline]
    pub(crate) fn en_passant(&self, square: Square) -> BoardKey {
        self.en_passant_keys[square.as_index()]
    }
}

fn next_key(rng: &mut StdRng) -> BoardKey {
    BoardKey {
        key: rng.gen(),
        lock: rng.gen(),
    }
}
