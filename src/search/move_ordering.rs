//! Move ordering by classified type.
//!
//! Buckets are emitted in `MoveType::PRIORITY` order and the remaining quiet
//! moves are shuffled. The search variant also sorts captures by MVV-LVA and
//! breaks ties, and orders quiet moves, by the history counters.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::{ChessMove, MoveType};
use crate::search::threading::HistoryTable;

fn bucket(moves: &[ChessMove], move_type: MoveType) -> Vec<ChessMove> {
    moves
        .iter()
        .filter(|mv| mv.move_type == move_type)
        .copied()
        .collect()
}

/// Classified legal moves in priority order with quiet moves shuffled.
pub fn ordered_moves<R: Rng + ?Sized>(
    game_state: &mut GameState,
    color: Color,
    rng: &mut R,
) -> Vec<ChessMove> {
    let moves = legal_moves(game_state, color);
    let mut ordered = Vec::with_capacity(moves.len());
    for move_type in MoveType::PRIORITY {
        ordered.extend(bucket(&moves, move_type));
    }
    let mut quiet = bucket(&moves, MoveType::Legal);
    quiet.shuffle(rng);
    ordered.extend(quiet);
    ordered
}

/// Ordering used inside the search.
pub fn sorted_for_search<R: Rng + ?Sized>(
    game_state: &mut GameState,
    color: Color,
    history: &HistoryTable,
    rng: &mut R,
) -> Vec<ChessMove> {
    let moves = legal_moves(game_state, color);
    let mut ordered = Vec::with_capacity(moves.len());
    for move_type in MoveType::PRIORITY {
        let mut group = bucket(&moves, move_type);
        if move_type == MoveType::Capture {
            group.sort_by_key(|mv| Reverse((mv.mvv_lva(), history.score(mv.from))));
        }
        ordered.extend(group);
    }

    let mut quiet = bucket(&moves, MoveType::Legal);
    quiet.shuffle(rng);
    quiet.sort_by_key(|mv| Reverse(history.score(mv.from)));
    ordered.extend(quiet);
    ordered
}

/// Captures only, MVV-LVA first.
pub fn captures_by_mvv_lva(moves: Vec<ChessMove>) -> Vec<ChessMove> {
    let mut captures: Vec<ChessMove> = moves.into_iter().filter(ChessMove::is_capture).collect();
    captures.sort_by_key(|mv| Reverse(mv.mvv_lva()));
    captures
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::chess_types::Square;
    use crate::search::zobrist::ZobristTable;
    use crate::utils::fen_parser::parse_fen;

    fn position(fen: &str) -> GameState {
        parse_fen(fen, Arc::new(ZobristTable::default()))
            .expect("test FEN should parse")
            .0
    }

    fn rank(move_type: MoveType) -> usize {
        MoveType::PRIORITY
            .iter()
            .position(|t| *t == move_type)
            .unwrap_or(MoveType::PRIORITY.len())
    }

    #[test]
    fn buckets_follow_priority() {
        let mut game = position("6k1/5ppp/8/3p4/4P3/8/8/R3K2R w KQ - 0 1");
        let mut rng = StdRng::seed_from_u64(7);
        let moves = ordered_moves(&mut game, Color::Light, &mut rng);
        assert_eq!(moves.len(), legal_moves(&mut game, Color::Light).len());
        assert_eq!(moves[0].move_type, MoveType::Checkmate);
        let ranks: Vec<usize> = moves.iter().map(|mv| rank(mv.move_type)).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn quiet_moves_are_shuffled_by_seed() {
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        let a = ordered_moves(&mut game, Color::Light, &mut StdRng::seed_from_u64(1));
        let b = ordered_moves(&mut game, Color::Light, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
        let c = ordered_moves(&mut game, Color::Light, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.len(), c.len());
    }

    #[test]
    fn captures_sorted_by_victim_then_history() {
        // The d4 knight can take the f5 queen or the c6 pawn.
        let mut game = position("4k3/8/2p5/5q2/3N4/8/8/4K3 w - - 0 1");
        let history = HistoryTable::default();
        let moves = sorted_for_search(
            &mut game,
            Color::Light,
            &history,
            &mut StdRng::seed_from_u64(3),
        );
        let captures: Vec<&ChessMove> = moves.iter().filter(|mv| mv.is_capture()).collect();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].to, Square::new(3, 5));
        assert_eq!(captures[1].to, Square::new(2, 2));
    }

    #[test]
    fn history_lifts_quiet_moves() {
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        let history = HistoryTable::default();
        let g1 = Square::new(7, 6);
        history.bump(g1, 4);
        let moves = sorted_for_search(
            &mut game,
            Color::Light,
            &history,
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(moves[0].from, g1);
        assert_eq!(moves[1].from, g1);
    }

    #[test]
    fn capture_filter_keeps_only_captures() {
        let mut game = position("4k3/8/2p5/5q2/3N4/8/8/4K3 w - - 0 1");
        let captures = captures_by_mvv_lva(legal_moves(&mut game, Color::Light));
        assert_eq!(captures.len(), 2);
        assert!(captures[0].mvv_lva() >= captures[1].mvv_lva());
    }
}
