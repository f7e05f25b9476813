//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{is_checkmate, is_stalemate};

pub const MATE_SCORE: i32 = 1_000_000;
/// Window bound strictly outside every reachable score.
pub const INFINITY_SCORE: i32 = 2 * MATE_SCORE;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of `side`: positive is good for `side`.
    ///
    /// Takes the position mutably because terminal detection probes moves;
    /// the board is restored before returning.
    fn score(&self, game_state: &mut GameState, side: Color) -> i32;
}

/// Terminal short-circuit shared by every scorer: `-MATE_SCORE` when `side`
/// is mated, `MATE_SCORE` when its opponent is, zero on stalemate.
pub fn terminal_score(game_state: &mut GameState, side: Color) -> Option<i32> {
    if is_checkmate(game_state, side) {
        Some(-MATE_SCORE)
    } else if is_checkmate(game_state, side.opposite()) {
        Some(MATE_SCORE)
    } else if is_stalemate(game_state) {
        Some(0)
    } else {
        None
    }
}

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE - 1_000
}

/// Pull a mate score found `ply` moves from the root toward zero so shorter
/// mates rank higher and longer defences rank higher when being mated.
#[inline]
pub fn mate_score_at_ply(score: i32, ply: u32) -> i32 {
    let ply = ply.min(1_000) as i32;
    if score >= MATE_SCORE {
        MATE_SCORE - ply
    } else if score <= -MATE_SCORE {
        -MATE_SCORE + ply
    } else {
        score
    }
}

/// Rebase a mate score found `ply` moves below the root onto the node at
/// `ply`, so the table holds the distance from the stored position.
#[inline]
pub fn mate_score_to_tt(score: i32, ply: u32) -> i32 {
    let ply = ply.min(1_000) as i32;
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        score + ply
    } else {
        score - ply
    }
}

/// Inverse of [`mate_score_to_tt`] for a node reached at `ply`.
#[inline]
pub fn mate_score_from_tt(score: i32, ply: u32) -> i32 {
    let ply = ply.min(1_000) as i32;
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        score - ply
    } else {
        score + ply
    }
}

/// Material-only scorer: sum of piece values for `side` minus its opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub fn material(game_state: &GameState, color: Color) -> i32 {
        game_state.team_pieces(color).map(|piece| piece.value()).sum()
    }

    #[inline]
    pub fn material_balance(game_state: &GameState, side: Color) -> i32 {
        Self::material(game_state, side) - Self::material(game_state, side.opposite())
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &mut GameState, side: Color) -> i32 {
        terminal_score(game_state, side)
            .unwrap_or_else(|| Self::material_balance(game_state, side))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::zobrist::ZobristTable;
    use crate::utils::fen_parser::parse_fen;

    fn position(fen: &str) -> GameState {
        parse_fen(fen, Arc::new(ZobristTable::default()))
            .expect("test FEN should parse")
            .0
    }

    #[test]
    fn material_is_antisymmetric() {
        let mut game = position("4k3/8/8/8/8/8/3Q4/4K3 w - - 0 1");
        let light = MaterialScorer.score(&mut game, Color::Light);
        let dark = MaterialScorer.score(&mut game, Color::Dark);
        assert_eq!(light, 900);
        assert_eq!(dark, -900);
    }

    #[test]
    fn start_position_is_balanced() {
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        assert_eq!(MaterialScorer.score(&mut game, Color::Light), 0);
    }

    #[test]
    fn terminal_scores_override_material() {
        // Dark is mated on the back rank despite being ahead in material.
        let mut mated = position("R5k1/5ppp/8/8/8/pppp4/8/6K1 b - - 0 1");
        assert_eq!(terminal_score(&mut mated, Color::Dark), Some(-MATE_SCORE));
        assert_eq!(MaterialScorer.score(&mut mated, Color::Light), MATE_SCORE);

        let mut stalemate = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(MaterialScorer.score(&mut stalemate, Color::Light), 0);

        let mut bare = position("8/8/8/3k4/8/8/8/4K3 w - - 0 1");
        assert_eq!(terminal_score(&mut bare, Color::Light), Some(0));
        assert!(is_mate_score(-MATE_SCORE + 3));
        assert!(!is_mate_score(900));
    }

    #[test]
    fn mate_scores_shrink_with_ply() {
        assert_eq!(mate_score_at_ply(MATE_SCORE, 3), MATE_SCORE - 3);
        assert_eq!(mate_score_at_ply(-MATE_SCORE, 3), -MATE_SCORE + 3);
        assert_eq!(mate_score_at_ply(250, 3), 250);
        assert!(mate_score_at_ply(MATE_SCORE, 1) > mate_score_at_ply(MATE_SCORE, 5));
    }

    #[test]
    fn table_mate_scores_count_from_the_node() {
        assert_eq!(mate_score_to_tt(MATE_SCORE - 7, 4), MATE_SCORE - 3);
        assert_eq!(mate_score_to_tt(-MATE_SCORE + 7, 4), -MATE_SCORE + 3);
        assert_eq!(mate_score_from_tt(MATE_SCORE - 3, 2), MATE_SCORE - 5);
        assert_eq!(mate_score_from_tt(-MATE_SCORE + 3, 2), -MATE_SCORE + 5);
        assert_eq!(mate_score_to_tt(-420, 9), -420);
        assert_eq!(mate_score_from_tt(420, 9), 420);
    }
}
