//! Helpers shared by the per-piece generators.

use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::moves::move_descriptions::ChessMove;
use crate::moves::sliding_moves::cast_ray;

/// Quiet move onto an empty square or capture of an enemy; `None` when
/// `to` holds a friendly piece.
#[inline]
pub fn move_to_square(game_state: &GameState, piece: &Piece, to: Square) -> Option<ChessMove> {
    match game_state.piece_at(to) {
        None => Some(ChessMove::new(*piece, to)),
        Some(occupant) if occupant.color != piece.color => {
            Some(ChessMove::new(*piece, to).capturing(occupant))
        }
        Some(_) => None,
    }
}

/// Fixed-offset movement (knight, king).
pub fn push_step_moves(
    game_state: &GameState,
    piece: &Piece,
    targets: impl Iterator<Item = Square>,
    out: &mut Vec<ChessMove>,
) {
    out.extend(targets.filter_map(|to| move_to_square(game_state, piece, to)));
}

/// Sliding movement: empty squares along each ray, plus the first blocker
/// when it belongs to the opponent.
pub fn push_ray_moves(
    game_state: &GameState,
    piece: &Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<ChessMove>,
) {
    for &direction in directions {
        cast_ray(game_state, piece.square, direction, |to, occupant| match occupant {
            None => out.push(ChessMove::new(*piece, to)),
            Some(blocker) if blocker.color != piece.color => {
                out.push(ChessMove::new(*piece, to).capturing(blocker));
            }
            Some(_) => {}
        });
    }
}
