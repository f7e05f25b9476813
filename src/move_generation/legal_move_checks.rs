//! Attack detection and end-of-game predicates.

use std::ops::ControlFlow;

use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::moves::king_moves::king_targets;
use crate::moves::knight_moves::knight_targets;
use crate::moves::pawn_moves::pawn_direction;
use crate::moves::sliding_moves::{first_blocker, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

/// Result of [`game_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The contained side has been mated.
    Checkmate(Color),
    Stalemate,
    InsufficientMaterial,
    Repetition,
}

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    game_state.king(color).map(|king| king.square)
}

/// Calls `visit` for each piece of `by` attacking `square`, searching outward
/// from the target. Stops as soon as `visit` breaks.
fn visit_attackers(
    game_state: &GameState,
    square: Square,
    by: Color,
    mut visit: impl FnMut(Piece) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let is_attacker = |piece: &Piece, kinds: &[PieceKind]| {
        piece.color == by && kinds.contains(&piece.kind)
    };

    // A pawn of `by` attacks diagonally forward, so it sits one row behind.
    let dir = pawn_direction(by);
    for d_col in [-1i8, 1] {
        if let Some(from) = square.offset(-dir, d_col) {
            if let Some(piece) = game_state.piece_at(from) {
                if is_attacker(&piece, &[PieceKind::Pawn]) {
                    visit(piece)?;
                }
            }
        }
    }

    for from in knight_targets(square) {
        if let Some(piece) = game_state.piece_at(from) {
            if is_attacker(&piece, &[PieceKind::Knight]) {
                visit(piece)?;
            }
        }
    }

    for direction in BISHOP_DIRECTIONS {
        if let Some(piece) = first_blocker(game_state, square, direction) {
            if is_attacker(&piece, &[PieceKind::Bishop, PieceKind::Queen]) {
                visit(piece)?;
            }
        }
    }

    for direction in ROOK_DIRECTIONS {
        if let Some(piece) = first_blocker(game_state, square, direction) {
            if is_attacker(&piece, &[PieceKind::Rook, PieceKind::Queen]) {
                visit(piece)?;
            }
        }
    }

    for from in king_targets(square) {
        if let Some(piece) = game_state.piece_at(from) {
            if is_attacker(&piece, &[PieceKind::King]) {
                visit(piece)?;
            }
        }
    }

    ControlFlow::Continue(())
}

/// Whether any piece of `by` attacks `square`. The occupant of `square`
/// itself is irrelevant.
pub fn is_attacked(game_state: &GameState, square: Square, by: Color) -> bool {
    visit_attackers(game_state, square, by, |_| ControlFlow::Break(())).is_break()
}

pub fn attackers_to_square(game_state: &GameState, square: Square, by: Color) -> Vec<Piece> {
    let mut attackers = Vec::new();
    let _ = visit_attackers(game_state, square, by, |piece| {
        attackers.push(piece);
        ControlFlow::Continue(())
    });
    attackers
}

/// `color`'s king is attacked. A side without a king is never in check.
#[inline]
pub fn in_check(game_state: &GameState, color: Color) -> bool {
    king_square(game_state, color)
        .is_some_and(|square| is_attacked(game_state, square, color.opposite()))
}

pub fn is_checkmate(game_state: &mut GameState, color: Color) -> bool {
    in_check(game_state, color) && !has_legal_move(game_state, color)
}

/// Bare kings, or a bare king against king plus one bishop or knight.
pub fn is_insufficient_material(game_state: &GameState) -> bool {
    let mut extras = game_state
        .pieces()
        .filter(|piece| piece.kind != PieceKind::King);
    match (extras.next(), extras.next()) {
        (None, _) => true,
        (Some(piece), None) => matches!(piece.kind, PieceKind::Bishop | PieceKind::Knight),
        _ => false,
    }
}

/// Either side has no legal move while not in check, or neither side can
/// mate.
pub fn is_stalemate(game_state: &mut GameState) -> bool {
    if is_insufficient_material(game_state) {
        return true;
    }
    [Color::Light, Color::Dark]
        .into_iter()
        .any(|color| !in_check(game_state, color) && !has_legal_move(game_state, color))
}

pub fn is_game_over(game_state: &mut GameState) -> bool {
    is_stalemate(game_state)
        || is_checkmate(game_state, Color::Light)
        || is_checkmate(game_state, Color::Dark)
}

/// Outcome for `side_to_move`, including committed-move repetition.
pub fn game_status(game_state: &mut GameState, side_to_move: Color) -> GameStatus {
    if is_insufficient_material(game_state) {
        return GameStatus::InsufficientMaterial;
    }
    if !has_legal_move(game_state, side_to_move) {
        return if in_check(game_state, side_to_move) {
            GameStatus::Checkmate(side_to_move)
        } else {
            GameStatus::Stalemate
        };
    }
    if game_state.is_threefold_repetition() {
        return GameStatus::Repetition;
    }
    GameStatus::Ongoing
}
