use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::moves::move_descriptions::ChessMove;
use crate::moves::pawn_moves::{pawn_attack_targets, pawn_direction, pawn_start_row, promotion_row};

/// Pushes, diagonal captures and en-passant captures for one pawn. Moves
/// landing on the far rank always promote to a queen.
pub fn generate_pawn_moves(game_state: &GameState, pawn: &Piece, out: &mut Vec<ChessMove>) {
    let dir = pawn_direction(pawn.color);
    let from = pawn.square;

    if let Some(one) = from.offset(dir, 0) {
        if game_state.piece_at(one).is_none() {
            out.push(with_promotion(ChessMove::new(*pawn, one)));

            if !pawn.has_moved && from.row == pawn_start_row(pawn.color) {
                if let Some(two) = from.offset(2 * dir, 0) {
                    if game_state.piece_at(two).is_none() {
                        out.push(ChessMove::new(*pawn, two));
                    }
                }
            }
        }
    }

    for to in pawn_attack_targets(pawn.color, from) {
        match game_state.piece_at(to) {
            Some(victim) if victim.color != pawn.color => {
                out.push(with_promotion(ChessMove::new(*pawn, to).capturing(victim)));
            }
            Some(_) => {}
            None => {
                if let Some(mv) = en_passant_capture(game_state, pawn, to) {
                    out.push(mv);
                }
            }
        }
    }
}

/// Capture onto the empty square `to`, removing the enemy pawn beside us that
/// just double-pushed past it.
fn en_passant_capture(game_state: &GameState, pawn: &Piece, to: Square) -> Option<ChessMove> {
    let passed = Square::new(pawn.square.row, to.col);
    let victim = game_state.piece_at(passed)?;
    if victim.kind != PieceKind::Pawn || victim.color == pawn.color || !victim.en_passant_available
    {
        return None;
    }

    let mut mv = ChessMove::new(*pawn, to).capturing(victim);
    mv.is_en_passant = true;
    Some(mv)
}

#[inline]
fn with_promotion(mut mv: ChessMove) -> ChessMove {
    if mv.to.row == promotion_row(mv.piece.color) {
        mv.promotion = Some(PieceKind::Queen);
    }
    mv
}
