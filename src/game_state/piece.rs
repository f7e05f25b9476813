//! Piece entity stored in each occupied board cell.

use crate::game_state::chess_rules::piece_value;
use crate::game_state::chess_types::{Color, PieceKind, Square};

/// A piece together with the per-piece flags make/undo must restore.
///
/// `en_passant_available` is only ever set on pawns and `has_castled` only on
/// kings; both stay `false` for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub has_moved: bool,
    pub is_captured: bool,
    pub en_passant_available: bool,
    pub has_castled: bool,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            has_moved: false,
            is_captured: false,
            en_passant_available: false,
            has_castled: false,
        }
    }

    #[inline]
    pub const fn value(&self) -> i32 {
        piece_value(self.kind)
    }

    /// Text code: uppercase for light, lowercase for dark.
    #[inline]
    pub fn code(&self) -> char {
        match self.color {
            Color::Light => self.kind.code(),
            Color::Dark => self.kind.code().to_ascii_lowercase(),
        }
    }
}
