//! Short algebraic notation for moves, without disambiguation.
//!
//! Castling always renders as the single token `0-0`, whichever side it is
//! played on. Promotions render like a plain push (`e8`), since the engine
//! only ever promotes to a queen.

use crate::errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::ChessMove;
use crate::utils::algebraic::{file_char, square_to_algebraic};

pub const CASTLE_TOKEN: &str = "0-0";

pub fn move_to_notation(chess_move: &ChessMove) -> String {
    if chess_move.is_castle() {
        return CASTLE_TOKEN.to_owned();
    }

    let mut out = String::with_capacity(6);
    match chess_move.piece.kind {
        PieceKind::Pawn => {
            if chess_move.is_capture() {
                out.push(file_char(chess_move.from.col));
                out.push('x');
            }
        }
        kind => {
            out.push(kind.code());
            if chess_move.is_capture() {
                out.push('x');
            }
        }
    }
    out.push_str(&square_to_algebraic(chess_move.to));
    if chess_move.gives_check {
        out.push('+');
    }
    out
}

/// King destination column asked for by a castling token.
fn castle_target_col(token: &str) -> Option<u8> {
    match token {
        "0-0" | "O-O" => Some(6),
        "0-0-0" | "O-O-O" => Some(2),
        _ => None,
    }
}

/// Find the legal move of `color` written as `token`.
///
/// Check (`+`) and mate (`#`) suffixes are optional. `0-0` prefers the king
/// side and falls back to the queen side, mirroring the single output token.
pub fn find_move_by_notation(
    game_state: &mut GameState,
    color: Color,
    token: &str,
) -> ChessResult<ChessMove> {
    let wanted = token.trim().trim_end_matches(['+', '#']);
    let moves = legal_moves(game_state, color);

    let found = if let Some(col) = castle_target_col(wanted) {
        let mut castles = moves.iter().filter(|mv| mv.is_castle());
        match castles.clone().find(|mv| mv.to.col == col) {
            Some(exact) => Some(exact),
            None if col == 6 => castles.next(),
            None => None,
        }
    } else {
        moves
            .iter()
            .find(|mv| move_to_notation(mv).trim_end_matches('+') == wanted)
    };

    found.copied().ok_or_else(|| ChessErrors::UnknownNotation {
        color,
        notation: token.to_owned(),
    })
}

/// Find the legal move of `color` from `from` to `to`.
pub fn find_move(
    game_state: &mut GameState,
    color: Color,
    from: Square,
    to: Square,
) -> ChessResult<ChessMove> {
    legal_moves(game_state, color)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to)
        .ok_or(ChessErrors::IllegalMove { color, from, to })
}
