//! Conversions between board squares and file+rank coordinates such as `e4`.

use crate::errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::Square;

#[inline]
pub fn file_char(col: u8) -> char {
    char::from(b'a' + col)
}

#[inline]
pub fn rank_char(row: u8) -> char {
    char::from(b'8' - row)
}

/// Convert a square to coordinates (for example: row 4, col 4 -> "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    format!("{}{}", file_char(square.col), rank_char(square.row))
}

/// Convert coordinates (for example: "e4") to a square.
pub fn algebraic_to_square(text: &str) -> ChessResult<Square> {
    let invalid = || ChessErrors::InvalidAlgebraicSquare(text.to_owned());
    let &[file, rank] = text.as_bytes() else {
        return Err(invalid());
    };
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(invalid());
    }
    Ok(Square::new(b'8' - rank, file - b'a'))
}
