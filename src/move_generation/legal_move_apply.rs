//! In-place make/undo of generated moves.
//!
//! Every `make_move` must be paired with an `undo_move` of the same move in
//! strict LIFO order. After the pair the board compares equal to what it was
//! before, including every per-piece flag.

use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::moves::king_moves::castle_rook_columns;
use crate::moves::move_descriptions::ChessMove;
use crate::utils::notation::move_to_notation;

/// Apply `chess_move`, recording its restoration fields.
///
/// `MoveFlag::Committed` additionally appends notation, records the
/// resulting position for repetition and sets the last move.
pub fn make_move(game_state: &mut GameState, chess_move: &mut ChessMove, flag: MoveFlag) {
    let notation = match flag {
        MoveFlag::Committed => Some(move_to_notation(chess_move)),
        MoveFlag::Probe => None,
    };

    chess_move.cleared_en_passant = clear_en_passant(game_state);
    chess_move.mover_had_moved = chess_move.piece.has_moved;

    if chess_move.is_castle() {
        make_castle(game_state, chess_move);
    } else {
        make_standard(game_state, chess_move);
    }

    if let Some(notation) = notation {
        game_state.record_commit(*chess_move, notation);
    }
}

/// Exact inverse of the most recent `make_move` of `chess_move`.
pub fn undo_move(game_state: &mut GameState, chess_move: &ChessMove) {
    if chess_move.is_castle() {
        undo_castle(game_state, chess_move);
    } else {
        undo_standard(game_state, chess_move);
    }

    game_state.set_en_passant_pawn(None);
    if let Some(square) = chess_move.cleared_en_passant {
        if let Some(pawn) = game_state.piece_at_mut(square) {
            pawn.en_passant_available = true;
        }
        game_state.set_en_passant_pawn(Some(square));
    }
}

/// Pass the turn without touching the board (null move).
#[inline]
pub fn skip_move(game_state: &mut GameState) {
    game_state.increment_skipped();
}

#[inline]
pub fn undo_skip_move(game_state: &mut GameState) {
    game_state.decrement_skipped();
}

/// En-passant rights last exactly one reply; drop any pending flag.
fn clear_en_passant(game_state: &mut GameState) -> Option<Square> {
    let square = game_state.en_passant_pawn()?;
    if let Some(pawn) = game_state.piece_at_mut(square) {
        pawn.en_passant_available = false;
    }
    game_state.set_en_passant_pawn(None);
    Some(square)
}

fn make_standard(game_state: &mut GameState, chess_move: &mut ChessMove) {
    let capture_square = if chess_move.is_en_passant {
        Square::new(chess_move.from.row, chess_move.to.col)
    } else {
        chess_move.to
    };

    chess_move.captured = game_state.take_piece(capture_square).map(|mut victim| {
        chess_move.captured_had_moved = victim.has_moved;
        victim.is_captured = true;
        victim
    });

    game_state.take_piece(chess_move.from);

    let mover = chess_move.piece;
    let mut moved = match chess_move.promotion {
        Some(kind) => Piece {
            has_moved: true,
            ..Piece::new(kind, mover.color, chess_move.to)
        },
        None => Piece {
            square: chess_move.to,
            has_moved: true,
            en_passant_available: false,
            ..mover
        },
    };

    if chess_move.is_double_push() {
        moved.en_passant_available = true;
        game_state.set_en_passant_pawn(Some(chess_move.to));
    }

    game_state.place_piece(moved);
}

fn undo_standard(game_state: &mut GameState, chess_move: &ChessMove) {
    game_state.take_piece(chess_move.to);

    game_state.place_piece(Piece {
        square: chess_move.from,
        has_moved: chess_move.mover_had_moved,
        ..chess_move.piece
    });

    if let Some(victim) = chess_move.captured {
        game_state.place_piece(Piece {
            is_captured: false,
            has_moved: chess_move.captured_had_moved,
            ..victim
        });
    }
}

fn make_castle(game_state: &mut GameState, chess_move: &mut ChessMove) {
    let row = chess_move.from.row;
    let (rook_from, rook_to) = castle_rook_columns(chess_move.to.col);

    game_state.take_piece(chess_move.from);
    game_state.place_piece(Piece {
        square: chess_move.to,
        has_moved: true,
        has_castled: true,
        ..chess_move.piece
    });

    if let Some(rook) = game_state.take_piece(Square::new(row, rook_from)) {
        game_state.place_piece(Piece {
            square: Square::new(row, rook_to),
            has_moved: true,
            ..rook
        });
    }
}

fn undo_castle(game_state: &mut GameState, chess_move: &ChessMove) {
    let row = chess_move.from.row;
    let (rook_from, rook_to) = castle_rook_columns(chess_move.to.col);

    game_state.take_piece(chess_move.to);
    game_state.place_piece(Piece {
        square: chess_move.from,
        has_moved: chess_move.mover_had_moved,
        has_castled: false,
        ..chess_move.piece
    });

    // Castling requires an unmoved rook, so restoring `has_moved = false` is exact.
    if let Some(rook) = game_state.take_piece(Square::new(row, rook_to)) {
        game_state.place_piece(Piece {
            square: Square::new(row, rook_from),
            has_moved: false,
            ..rook
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::move_generation::legal_move_generator::legal_moves;
    use crate::search::zobrist::ZobristTable;
    use crate::utils::fen_parser::parse_fen;

    fn position(fen: &str) -> (GameState, Color) {
        parse_fen(fen, Arc::new(ZobristTable::default())).expect("test FEN should parse")
    }

    fn assert_every_move_round_trips(fen: &str) {
        let (mut game, side) = position(fen);
        let before = game.clone();
        let hash = game.content_hash();
        for mut mv in legal_moves(&mut game, side) {
            make_move(&mut game, &mut mv, MoveFlag::Probe);
            assert_ne!(game, before, "move {mv:?} left the board unchanged");
            undo_move(&mut game, &mv);
            assert_eq!(game, before, "undo of {mv:?} did not restore the board");
            assert_eq!(game.content_hash(), hash);
        }
    }

    #[test]
    fn undo_restores_start_position() {
        assert_every_move_round_trips(crate::game_state::chess_rules::STARTING_POSITION_FEN);
    }

    #[test]
    fn undo_restores_castles_captures_and_promotions() {
        assert_every_move_round_trips(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        );
        assert_every_move_round_trips("r3k2r/1P6/8/8/8/8/6p1/R3K2R b KQkq - 0 1");
    }

    #[test]
    fn undo_restores_en_passant_capture() {
        assert_every_move_round_trips("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    }

    #[test]
    fn random_playout_unwinds_to_start() {
        use rand::seq::IndexedRandom;

        let (mut game, mut side) = position(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        let start = game.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let mut played = Vec::new();

        for _ in 0..60 {
            let moves = legal_moves(&mut game, side);
            let Some(&choice) = moves.choose(&mut rng) else {
                break;
            };
            let mut mv = choice;
            make_move(&mut game, &mut mv, MoveFlag::Probe);
            played.push(mv);
            side = side.opposite();
        }

        while let Some(mv) = played.pop() {
            undo_move(&mut game, &mv);
        }
        assert_eq!(game, start);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let (mut game, _) = position("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let mut ep = legal_moves(&mut game, Color::Light)
            .into_iter()
            .find(|mv| mv.is_en_passant)
            .expect("en passant should be available");

        make_move(&mut game, &mut ep, MoveFlag::Probe);
        assert!(game.piece_at(Square::new(3, 3)).is_none());
        let pawn = game.piece_at(Square::new(2, 3)).expect("capturing pawn");
        assert_eq!((pawn.kind, pawn.color), (PieceKind::Pawn, Color::Light));
        assert!(ep.captured.is_some_and(|victim| victim.is_captured));
    }

    #[test]
    fn en_passant_right_expires_after_one_reply() {
        let (mut game, _) = position("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1");
        let mut push = legal_moves(&mut game, Color::Dark)
            .into_iter()
            .find(|mv| mv.is_double_push())
            .expect("d7-d5");
        make_move(&mut game, &mut push, MoveFlag::Probe);
        assert!(legal_moves(&mut game, Color::Light)
            .iter()
            .any(|mv| mv.is_en_passant));

        let mut king_step = legal_moves(&mut game, Color::Light)
            .into_iter()
            .find(|mv| mv.piece.kind == PieceKind::King)
            .expect("king move");
        make_move(&mut game, &mut king_step, MoveFlag::Probe);
        let mut dark_king = legal_moves(&mut game, Color::Dark)
            .into_iter()
            .find(|mv| mv.piece.kind == PieceKind::King)
            .expect("king move");
        make_move(&mut game, &mut dark_king, MoveFlag::Probe);

        assert!(!legal_moves(&mut game, Color::Light)
            .iter()
            .any(|mv| mv.is_en_passant));
    }

    #[test]
    fn castling_moves_king_and_rook_together() {
        let (mut game, _) = position("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let before = game.clone();
        let mut castle = legal_moves(&mut game, Color::Light)
            .into_iter()
            .find(|mv| mv.is_castle() && mv.to.col == 6)
            .expect("kingside castle");

        make_move(&mut game, &mut castle, MoveFlag::Probe);
        let king = game.piece_at(Square::new(7, 6)).expect("king on g1");
        assert!(king.has_castled && king.has_moved);
        let rook = game.piece_at(Square::new(7, 5)).expect("rook on f1");
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(game.piece_at(Square::new(7, 7)).is_none());

        undo_move(&mut game, &castle);
        assert_eq!(game, before);
    }

    #[test]
    fn committed_moves_record_history_but_probes_do_not() {
        let (mut game, _) = position(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        let mut probe = legal_moves(&mut game, Color::Light)[0];
        make_move(&mut game, &mut probe, MoveFlag::Probe);
        assert!(game.notation().is_empty());
        assert!(game.last_move().is_none());
        undo_move(&mut game, &probe);

        let mut e4 = legal_moves(&mut game, Color::Light)
            .into_iter()
            .find(|mv| mv.to == Square::new(4, 4) && mv.from == Square::new(6, 4))
            .expect("e2e4");
        make_move(&mut game, &mut e4, MoveFlag::Committed);
        assert_eq!(game.notation(), ["e4".to_owned()]);
        assert_eq!(game.last_move().map(|mv| mv.to), Some(Square::new(4, 4)));
        assert_eq!(game.repetition_count(game.content_hash()), 1);
    }

    #[test]
    fn skip_move_counts_passes() {
        let (mut game, _) = position(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        let before = game.clone();
        skip_move(&mut game);
        skip_move(&mut game);
        assert_eq!(game.skipped_moves(), 2);
        undo_skip_move(&mut game);
        undo_skip_move(&mut game);
        assert_eq!(game.skipped_moves(), 0);
        assert_eq!(game, before);
    }
}
