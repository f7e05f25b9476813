use crate::game_state::chess_rules::KING_START_COL;
use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_checks::is_attacked;
use crate::move_generation::legal_move_shared::push_step_moves;
use crate::moves::king_moves::{castle_rook_columns, king_targets};
use crate::moves::move_descriptions::ChessMove;

pub fn generate_king_moves(game_state: &GameState, king: &Piece, out: &mut Vec<ChessMove>) {
    push_step_moves(game_state, king, king_targets(king.square), out);
    push_castle_moves(game_state, king, out);
}

/// Castling candidates: king and rook unmoved, path clear, and the king's
/// current, transit and destination squares not attacked.
fn push_castle_moves(game_state: &GameState, king: &Piece, out: &mut Vec<ChessMove>) {
    let row = king.color.home_row();
    if king.has_moved
        || king.has_castled
        || king.square != Square::new(row, KING_START_COL)
    {
        return;
    }

    let enemy = king.color.opposite();
    if is_attacked(game_state, king.square, enemy) {
        return;
    }

    for king_to_col in [KING_START_COL + 2, KING_START_COL - 2] {
        let (rook_col, _) = castle_rook_columns(king_to_col);
        let rook_ready = game_state
            .piece_at(Square::new(row, rook_col))
            .is_some_and(|rook| {
                rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved
            });
        if !rook_ready {
            continue;
        }

        let (lo, hi) = if rook_col > KING_START_COL {
            (KING_START_COL + 1, rook_col)
        } else {
            (rook_col + 1, KING_START_COL)
        };
        if (lo..hi).any(|col| game_state.piece_at(Square::new(row, col)).is_some()) {
            continue;
        }

        let step: i8 = if king_to_col > KING_START_COL { 1 } else { -1 };
        let transit = Square::new(row, (KING_START_COL as i8 + step) as u8);
        let destination = Square::new(row, king_to_col);
        if is_attacked(game_state, transit, enemy) || is_attacked(game_state, destination, enemy) {
            continue;
        }

        out.push(ChessMove::new(*king, destination));
    }
}
