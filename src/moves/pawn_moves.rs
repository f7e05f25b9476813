//! Pawn direction and rank geometry.

use crate::game_state::chess_types::{Color, Square};

/// Row delta of a single pawn push. Light advances toward row 0.
#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::Light => -1,
        Color::Dark => 1,
    }
}

#[inline]
pub const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::Light => 6,
        Color::Dark => 1,
    }
}

#[inline]
pub const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::Light => 0,
        Color::Dark => 7,
    }
}

/// Pushes still needed before a pawn of `color` on `square` promotes.
#[inline]
pub const fn promotion_distance(color: Color, square: Square) -> u8 {
    square.row.abs_diff(promotion_row(color))
}

/// Squares a pawn of `color` on `square` attacks diagonally.
#[inline]
pub fn pawn_attack_targets(color: Color, square: Square) -> impl Iterator<Item = Square> {
    let dir = pawn_direction(color);
    [-1i8, 1]
        .into_iter()
        .filter_map(move |d_col| square.offset(dir, d_col))
}
