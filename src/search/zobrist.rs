//! Zobrist hashing support for position identity and repetition tracking.
//!
//! The table is built once at startup and handed to every `GameState` through
//! an `Arc`, so positions from the same table hash consistently. Building from
//! a fixed seed gives identical hashes across runs, which keeps tests and
//! debugging deterministic.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::game_state::{chess_types::*, piece::Piece};

#[derive(Debug, Clone)]
pub struct ZobristTable {
    // [color * 6 + kind][row][col]
    piece_square: [[[u64; 8]; 8]; 12],
    side_to_move: u64,
    dark_root: u64,
}

impl ZobristTable {
    pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut piece_square = [[[0u64; 8]; 8]; 12];
        for plane in &mut piece_square {
            for row in plane {
                for key in row {
                    *key = rng.random();
                }
            }
        }

        Self {
            piece_square,
            side_to_move: rng.random(),
            dark_root: rng.random(),
        }
    }

    /// Table seeded from the thread RNG; hashes differ between processes.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    #[inline]
    pub fn piece_square_key(&self, color: Color, kind: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index() * 6 + kind.index()][square.row as usize]
            [square.col as usize]
    }

    #[inline]
    pub fn piece_key(&self, piece: &Piece) -> u64 {
        self.piece_square_key(piece.color, piece.kind, piece.square)
    }

    /// Toggle mixed into search keys when dark is to move.
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    /// Toggle mixed into search keys when the search runs for dark. Scores
    /// are stored from the searching side's point of view, so searches for
    /// opposite sides must not share entries.
    #[inline]
    pub fn dark_root_key(&self) -> u64 {
        self.dark_root
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::seeded(Self::DEFAULT_SEED)
    }
}
