//! Capture-only extension applied once the nominal depth is exhausted.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move, undo_move};
use crate::move_generation::legal_move_generator::legal_moves_unclassified;
use crate::search::board_scoring::{is_mate_score, mate_score_at_ply, BoardScorer};
use crate::search::move_ordering::captures_by_mvv_lva;

/// Neither side has a legal capture.
pub fn is_quiet(game_state: &mut GameState) -> bool {
    [Color::Light, Color::Dark].into_iter().all(|color| {
        !legal_moves_unclassified(game_state, color)
            .iter()
            .any(|mv| mv.is_capture())
    })
}

/// Negamax over captures for `side`, scored from `side`'s perspective.
///
/// The static evaluation stands pat as a lower bound; `depth_left` caps how
/// many capture plies are followed.
#[allow(clippy::too_many_arguments)]
pub fn quiescence<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    side: Color,
    mut alpha: i32,
    beta: i32,
    depth_left: u32,
    ply: u32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    let stand_pat = mate_score_at_ply(scorer.score(game_state, side), ply);
    if depth_left == 0 || is_mate_score(stand_pat) {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    alpha = alpha.max(stand_pat);

    for mut mv in captures_by_mvv_lva(legal_moves_unclassified(game_state, side)) {
        make_move(game_state, &mut mv, MoveFlag::Probe);
        let score = -quiescence(
            game_state,
            scorer,
            side.opposite(),
            -beta,
            -alpha,
            depth_left - 1,
            ply + 1,
            nodes,
        );
        undo_move(game_state, &mv);

        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }
    alpha
}
