//! Ray directions for bishops, rooks and queens.

use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// Walk from `from` along `(d_row, d_col)`, yielding every empty square and
/// finally the first blocker (if any) with its occupant.
pub fn cast_ray(
    game_state: &GameState,
    from: Square,
    (d_row, d_col): (i8, i8),
    mut visit: impl FnMut(Square, Option<Piece>),
) {
    let mut current = from;
    while let Some(next) = current.offset(d_row, d_col) {
        let occupant = game_state.piece_at(next);
        visit(next, occupant);
        if occupant.is_some() {
            return;
        }
        current = next;
    }
}

/// First occupied square reached along a ray, if any.
pub fn first_blocker(game_state: &GameState, from: Square, direction: (i8, i8)) -> Option<Piece> {
    let mut blocker = None;
    cast_ray(game_state, from, direction, |_, occupant| {
        if occupant.is_some() {
            blocker = occupant;
        }
    });
    blocker
}
