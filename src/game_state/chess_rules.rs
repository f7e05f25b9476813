//! Static rule tables: material values, the initial layout and stage
//! thresholds.

use crate::game_state::chess_types::{GameStage, PieceKind};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back-rank layout from the a-file to the h-file, shared by both sides.
pub const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const KING_START_COL: u8 = 4;
pub const QUEEN_START_COL: u8 = 3;
pub const KINGSIDE_ROOK_COL: u8 = 7;
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// Piece count at or above which the game is still in the opening.
pub const OPENING_PIECE_THRESHOLD: usize = 29;
/// Piece count above which the game is still in the middle game.
pub const ENDGAME_PIECE_THRESHOLD: usize = 10;

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 350,
        PieceKind::Bishop => 375,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

#[inline]
pub const fn game_stage_for_piece_count(pieces: usize) -> GameStage {
    if pieces >= OPENING_PIECE_THRESHOLD {
        GameStage::Opening
    } else if pieces > ENDGAME_PIECE_THRESHOLD {
        GameStage::Middle
    } else {
        GameStage::End
    }
}
