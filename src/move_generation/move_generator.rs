//! Pseudo-legal move generation, dispatched per piece kind.
//!
//! Output here ignores the safety of the mover's own king; the legality pass
//! in `legal_move_generator` filters and classifies it.

use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::move_descriptions::ChessMove;

pub fn generate_pseudo_legal_moves(game_state: &GameState, piece: &Piece, out: &mut Vec<ChessMove>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(game_state, piece, out),
        PieceKind::Knight => generate_knight_moves(game_state, piece, out),
        PieceKind::Bishop => generate_bishop_moves(game_state, piece, out),
        PieceKind::Rook => generate_rook_moves(game_state, piece, out),
        PieceKind::Queen => generate_queen_moves(game_state, piece, out),
        PieceKind::King => generate_king_moves(game_state, piece, out),
    }
}

pub fn generate_team_pseudo_legal_moves(
    game_state: &GameState,
    color: Color,
    out: &mut Vec<ChessMove>,
) {
    for piece in game_state.team_pieces(color) {
        generate_pseudo_legal_moves(game_state, &piece, out);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::zobrist::ZobristTable;

    fn empty() -> GameState {
        GameState::new_empty(Arc::new(ZobristTable::default()))
    }

    #[test]
    fn sliding_ray_stops_at_first_blocker() {
        let mut game = empty();
        let rook = Piece::new(PieceKind::Rook, Color::Light, Square::new(7, 0));
        game.place_piece(rook);
        game.place_piece(Piece::new(PieceKind::Pawn, Color::Dark, Square::new(4, 0)));
        game.place_piece(Piece::new(PieceKind::Knight, Color::Light, Square::new(7, 3)));

        let mut out = Vec::new();
        generate_pseudo_legal_moves(&game, &rook, &mut out);

        // up: rows 6, 5 and the capture on 4; right: cols 1 and 2.
        assert_eq!(out.len(), 5);
        assert_eq!(out.iter().filter(|mv| mv.is_capture()).count(), 1);
        assert!(!out.iter().any(|mv| mv.to == Square::new(7, 3)));
    }

    #[test]
    fn pawn_double_push_only_from_start_row() {
        let mut game = empty();
        let fresh = Piece::new(PieceKind::Pawn, Color::Light, Square::new(6, 1));
        let advanced = Piece {
            has_moved: true,
            ..Piece::new(PieceKind::Pawn, Color::Light, Square::new(5, 5))
        };
        game.place_piece(fresh);
        game.place_piece(advanced);

        let mut out = Vec::new();
        generate_pseudo_legal_moves(&game, &fresh, &mut out);
        assert_eq!(out.len(), 2);

        out.clear();
        generate_pseudo_legal_moves(&game, &advanced, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn pawn_reaching_last_rank_promotes_to_queen() {
        let mut game = empty();
        let pawn = Piece {
            has_moved: true,
            ..Piece::new(PieceKind::Pawn, Color::Dark, Square::new(6, 3))
        };
        game.place_piece(pawn);
        game.place_piece(Piece::new(PieceKind::Rook, Color::Light, Square::new(7, 4)));

        let mut out = Vec::new();
        generate_pseudo_legal_moves(&game, &pawn, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|mv| mv.promotion == Some(PieceKind::Queen)));
    }

    #[test]
    fn en_passant_requires_flagged_neighbour() {
        let mut game = empty();
        let pawn = Piece {
            has_moved: true,
            ..Piece::new(PieceKind::Pawn, Color::Light, Square::new(3, 4))
        };
        let passed = Piece {
            has_moved: true,
            en_passant_available: true,
            ..Piece::new(PieceKind::Pawn, Color::Dark, Square::new(3, 3))
        };
        game.place_piece(pawn);
        game.place_piece(passed);

        let mut out = Vec::new();
        generate_pseudo_legal_moves(&game, &pawn, &mut out);
        let ep: Vec<_> = out.iter().filter(|mv| mv.is_en_passant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to, Square::new(2, 3));
        assert_eq!(ep[0].captured.map(|p| p.square), Some(passed.square));

        game.place_piece(Piece {
            en_passant_available: false,
            ..passed
        });
        out.clear();
        generate_pseudo_legal_moves(&game, &pawn, &mut out);
        assert!(!out.iter().any(|mv| mv.is_en_passant));
    }

    #[test]
    fn castling_blocked_through_attacked_square() {
        let mut game = empty();
        let king = Piece::new(PieceKind::King, Color::Light, Square::new(7, 4));
        game.place_piece(king);
        game.place_piece(Piece::new(PieceKind::Rook, Color::Light, Square::new(7, 7)));
        game.place_piece(Piece::new(PieceKind::Rook, Color::Light, Square::new(7, 0)));

        let mut out = Vec::new();
        generate_pseudo_legal_moves(&game, &king, &mut out);
        assert_eq!(out.iter().filter(|mv| mv.is_castle()).count(), 2);

        // Dark rook eyes f1, the kingside transit square.
        game.place_piece(Piece::new(PieceKind::Rook, Color::Dark, Square::new(0, 5)));
        out.clear();
        generate_pseudo_legal_moves(&game, &king, &mut out);
        let castles: Vec<_> = out.iter().filter(|mv| mv.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to, Square::new(7, 2));
    }
}
