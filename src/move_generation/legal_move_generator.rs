//! Legal move generation and move classification.
//!
//! Pseudo-legal candidates are probed with make/undo: moves leaving the
//! mover's king attacked are dropped and the survivors get a `MoveType`.

use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_apply::{make_move, undo_move};
use crate::move_generation::legal_move_checks::in_check;
use crate::move_generation::move_generator::generate_pseudo_legal_moves;
use crate::moves::move_descriptions::{ChessMove, MoveType};

/// Classified legal moves of a single piece.
pub fn legal_moves_for_piece(game_state: &mut GameState, piece: &Piece) -> Vec<ChessMove> {
    let mut candidates = Vec::new();
    generate_pseudo_legal_moves(game_state, piece, &mut candidates);
    candidates
        .into_iter()
        .filter_map(|mv| classify_move(game_state, mv))
        .collect()
}

/// Classified legal moves for every piece of `color`.
pub fn legal_moves(game_state: &mut GameState, color: Color) -> Vec<ChessMove> {
    let team: Vec<Piece> = game_state.team_pieces(color).collect();
    team.iter()
        .flat_map(|piece| legal_moves_for_piece(game_state, piece))
        .collect()
}

pub fn moves_of_type(game_state: &mut GameState, color: Color, move_type: MoveType) -> Vec<ChessMove> {
    let mut moves = legal_moves(game_state, color);
    moves.retain(|mv| mv.move_type == move_type);
    moves
}

/// Whether `color` has at least one legal move. Skips classification, so it
/// is safe to call from inside classification itself.
pub fn has_legal_move(game_state: &mut GameState, color: Color) -> bool {
    let team: Vec<Piece> = game_state.team_pieces(color).collect();
    let mut candidates = Vec::new();
    for piece in &team {
        candidates.clear();
        generate_pseudo_legal_moves(game_state, piece, &mut candidates);
        for mv in &candidates {
            if leaves_king_safe(game_state, mv) {
                return true;
            }
        }
    }
    false
}

/// Unclassified legal moves; cheaper than [`legal_moves`] when the move type
/// is not needed.
pub fn legal_moves_unclassified(game_state: &mut GameState, color: Color) -> Vec<ChessMove> {
    let team: Vec<Piece> = game_state.team_pieces(color).collect();
    let mut candidates = Vec::new();
    for piece in &team {
        generate_pseudo_legal_moves(game_state, piece, &mut candidates);
    }
    candidates.retain(|mv| leaves_king_safe(game_state, mv));
    candidates
}

fn leaves_king_safe(game_state: &mut GameState, mv: &ChessMove) -> bool {
    let mut probe = *mv;
    make_move(game_state, &mut probe, MoveFlag::Probe);
    let safe = !in_check(game_state, mv.piece.color);
    undo_move(game_state, &probe);
    safe
}

/// Legality plus type assignment. A move that mates is `Checkmate`;
/// otherwise the first of capture, check, castle and promotion that applies
/// wins, falling back to `Legal`. Returns `None` for illegal moves.
pub fn classify_move(game_state: &mut GameState, mut mv: ChessMove) -> Option<ChessMove> {
    let color = mv.piece.color;
    let opponent = color.opposite();

    let mut probe = mv;
    make_move(game_state, &mut probe, MoveFlag::Probe);
    let legal = !in_check(game_state, color);
    let gives_check = legal && in_check(game_state, opponent);
    let mates = gives_check && !has_legal_move(game_state, opponent);
    undo_move(game_state, &probe);

    if !legal {
        return None;
    }

    mv.gives_check = gives_check;
    mv.move_type = if mates {
        MoveType::Checkmate
    } else if mv.is_capture() {
        MoveType::Capture
    } else if gives_check {
        MoveType::Check
    } else if mv.is_castle() {
        MoveType::Castle
    } else if mv.promotion.is_some() {
        MoveType::Promotion
    } else {
        MoveType::Legal
    };
    Some(mv)
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
    fn start_position_has_twenty_moves_each_side() {
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        assert_eq!(legal_moves(&mut game, Color::Light).len(), 20);
        assert_eq!(legal_moves(&mut game, Color::Dark).len(), 20);
        assert_eq!(legal_moves_unclassified(&mut game, Color::Light).len(), 20);
        assert!(legal_moves(&mut game, Color::Light)
            .iter()
            .all(|mv| mv.move_type == MoveType::Legal));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // e2 knight is pinned against the e1 king by the e8 rook.
        let mut game = position("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let knight = game.piece_at(Square::new(6, 4)).expect("knight");
        assert!(legal_moves_for_piece(&mut game, &knight).is_empty());
    }

    #[test]
    fn classification_types() {
        let mut game = position("6k1/5ppp/8/8/8/3p4/8/R3K2R w KQ - 0 1");
        let moves = legal_moves(&mut game, Color::Light);
        let of = |from: Square, to: Square| {
            moves
                .iter()
                .find(|mv| mv.from == from && mv.to == to)
                .map(|mv| mv.move_type)
        };

        // Ra8 is a back-rank mate.
        assert_eq!(of(Square::new(7, 0), Square::new(0, 0)), Some(MoveType::Checkmate));
        // Rh3 is quiet: the h7 pawn blocks the file.
        assert_eq!(of(Square::new(7, 7), Square::new(5, 7)), Some(MoveType::Legal));
        assert_eq!(of(Square::new(7, 4), Square::new(7, 6)), Some(MoveType::Castle));
        assert_eq!(of(Square::new(7, 4), Square::new(7, 2)), Some(MoveType::Castle));
        assert_eq!(
            moves_of_type(&mut game, Color::Light, MoveType::Checkmate).len(),
            1
        );
    }

    #[test]
    fn checking_and_capturing_moves() {
        let mut game = position("4k3/8/8/8/8/2n5/8/R3K3 w - - 0 1");
        let moves = legal_moves(&mut game, Color::Light);
        let check = moves
            .iter()
            .find(|mv| mv.to == Square::new(0, 0))
            .expect("Ra8+");
        assert_eq!(check.move_type, MoveType::Check);
        assert!(check.gives_check);

        // The c3 knight covers e2 and d1.
        assert!(!moves.iter().any(|mv| mv.to == Square::new(6, 4)));
        assert!(!moves.iter().any(|mv| mv.to == Square::new(7, 3)));
    }

    #[test]
    fn promotion_is_classified() {
        let mut game = position("k7/4P3/8/8/8/8/8/K7 w - - 0 1");
        let promo = legal_moves(&mut game, Color::Light)
            .into_iter()
            .find(|mv| mv.piece.kind == PieceKind::Pawn)
            .expect("e8=Q");
        assert_eq!(promo.promotion, Some(PieceKind::Queen));
        assert_eq!(promo.move_type, MoveType::Check);
    }
}
