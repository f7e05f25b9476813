//! King step geometry and castling layout.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::Square;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[inline]
pub fn king_targets(square: Square) -> impl Iterator<Item = Square> {
    KING_OFFSETS
        .into_iter()
        .filter_map(move |(d_row, d_col)| square.offset(d_row, d_col))
}

/// Rook source and destination columns for a castle landing the king on
/// `king_to_col`.
#[inline]
pub const fn castle_rook_columns(king_to_col: u8) -> (u8, u8) {
    if king_to_col > 4 {
        (KINGSIDE_ROOK_COL, 5)
    } else {
        (QUEENSIDE_ROOK_COL, 3)
    }
}
