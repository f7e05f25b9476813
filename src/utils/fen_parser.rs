//! FEN-to-GameState parser.
//!
//! The placement field is required. Side to move, castling rights and the
//! en-passant square are honoured when present; the clocks are accepted and
//! ignored. Per-piece `has_moved` flags are inferred from the starting
//! squares and narrowed by the castling field.

use std::sync::Arc;

use crate::errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::{
    BACK_RANK_LAYOUT, KINGSIDE_ROOK_COL, KING_START_COL, QUEENSIDE_ROOK_COL,
};
use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::moves::pawn_moves::{pawn_direction, pawn_start_row};
use crate::search::zobrist::ZobristTable;
use crate::utils::algebraic::algebraic_to_square;

/// Parse a FEN string into a board and the side to move (light when the
/// field is absent).
pub fn parse_fen(fen: &str, zobrist: Arc<ZobristTable>) -> ChessResult<(GameState, Color)> {
    let mut parts = fen.split_whitespace();
    let board_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidBoardLayout("empty FEN".to_owned()))?;
    let side_part = parts.next();
    let castling_part = parts.next();
    let en_passant_part = parts.next();

    let mut game_state = GameState::new_empty(zobrist);
    parse_board(board_part, &mut game_state)?;

    let side_to_move = match side_part {
        None | Some("w") => Color::Light,
        Some("b") => Color::Dark,
        Some(other) => return Err(fen_error(other, "side to move must be 'w' or 'b'")),
    };

    if let Some(castling) = castling_part {
        apply_castling_rights(castling, &mut game_state)?;
    }

    if let Some(target) = en_passant_part.filter(|part| *part != "-") {
        apply_en_passant(target, side_to_move, &mut game_state)?;
    }

    game_state.record_position();
    Ok((game_state, side_to_move))
}

fn fen_error(field: &str, reason: &str) -> ChessErrors {
    ChessErrors::InvalidFenField {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let rows: Vec<&str> = board_part.split('/').collect();
    if rows.len() != 8 {
        return Err(ChessErrors::InvalidBoardLayout(format!(
            "expected 8 ranks, found {}",
            rows.len()
        )));
    }

    for (row, row_str) in rows.iter().enumerate() {
        let row = row as u8;
        let mut col = 0u8;

        for ch in row_str.chars() {
            if let Some(empty) = ch.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(ChessErrors::InvalidBoardLayout(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                col += empty as u8;
                continue;
            }

            let kind = PieceKind::from_code(ch).ok_or(ChessErrors::UnknownPieceCode(ch))?;
            let color = if ch.is_ascii_uppercase() {
                Color::Light
            } else {
                Color::Dark
            };

            if col >= 8 {
                return Err(ChessErrors::InvalidBoardLayout(format!(
                    "rank '{row_str}' has too many files"
                )));
            }

            let square = Square::new(row, col);
            game_state.place_piece(Piece {
                has_moved: !on_starting_square(kind, color, square),
                ..Piece::new(kind, color, square)
            });
            col += 1;
        }

        if col != 8 {
            return Err(ChessErrors::InvalidBoardLayout(format!(
                "rank '{row_str}' does not sum to 8 files"
            )));
        }
    }

    Ok(())
}

fn on_starting_square(kind: PieceKind, color: Color, square: Square) -> bool {
    match kind {
        PieceKind::Pawn => square.row == pawn_start_row(color),
        _ => square.row == color.home_row() && BACK_RANK_LAYOUT[square.col as usize] == kind,
    }
}

/// Kings and rooks not covered by a right are marked as moved.
fn apply_castling_rights(castling: &str, game_state: &mut GameState) -> ChessResult<()> {
    let mut keep_unmoved: Vec<(Color, u8)> = Vec::new();
    if castling != "-" {
        for ch in castling.chars() {
            let (color, rook_col) = match ch {
                'K' => (Color::Light, KINGSIDE_ROOK_COL),
                'Q' => (Color::Light, QUEENSIDE_ROOK_COL),
                'k' => (Color::Dark, KINGSIDE_ROOK_COL),
                'q' => (Color::Dark, QUEENSIDE_ROOK_COL),
                _ => return Err(fen_error(castling, "unknown castling right")),
            };
            keep_unmoved.push((color, rook_col));
            keep_unmoved.push((color, KING_START_COL));
        }
    }

    for color in [Color::Light, Color::Dark] {
        let row = color.home_row();
        for col in [QUEENSIDE_ROOK_COL, KING_START_COL, KINGSIDE_ROOK_COL] {
            if keep_unmoved.contains(&(color, col)) {
                continue;
            }
            if let Some(piece) = game_state.piece_at_mut(Square::new(row, col)) {
                if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
                    piece.has_moved = true;
                }
            }
        }
    }
    Ok(())
}

/// Flag the pawn that just double-pushed past `target`.
fn apply_en_passant(target: &str, side_to_move: Color, game_state: &mut GameState) -> ChessResult<()> {
    let target_square = algebraic_to_square(target)?;
    let pusher = side_to_move.opposite();
    let pawn_square = target_square
        .offset(pawn_direction(pusher), 0)
        .ok_or_else(|| fen_error(target, "en-passant square on the edge"))?;

    match game_state.piece_at_mut(pawn_square) {
        Some(pawn) if pawn.kind == PieceKind::Pawn && pawn.color == pusher => {
            pawn.en_passant_available = true;
            pawn.has_moved = true;
        }
        _ => return Err(fen_error(target, "no pawn to capture en passant")),
    }
    game_state.set_en_passant_pawn(Some(pawn_square));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    fn zobrist() -> Arc<ZobristTable> {
        Arc::new(ZobristTable::default())
    }

    #[test]
    fn start_fen_matches_new_game() {
        let table = zobrist();
        let (parsed, side) = parse_fen(STARTING_POSITION_FEN, table.clone()).expect("start FEN");
        assert_eq!(side, Color::Light);
        assert_eq!(parsed, GameState::new_game(table));
    }

    #[test]
    fn placement_only_is_accepted() {
        let (game, side) = parse_fen("8/8/8/8/8/8/8/K6k", zobrist()).expect("placement only");
        assert_eq!(side, Color::Light);
        assert_eq!(game.piece_count(), 2);
    }

    #[test]
    fn unknown_piece_code_fails_fast() {
        let err = parse_fen("8/8/8/8/8/8/8/K6x w - - 0 1", zobrist()).expect_err("bad code");
        assert!(matches!(err, ChessErrors::UnknownPieceCode('x')));
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        assert!(parse_fen("8/8/8/8/8/8/8", zobrist()).is_err());
        assert!(parse_fen("9/8/8/8/8/8/8/8", zobrist()).is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/7", zobrist()).is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 x", zobrist()).is_err());
    }

    #[test]
    fn castling_field_marks_rooks_and_kings() {
        let (game, _) = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1", zobrist()).expect("fen");
        let moved = |row, col| {
            game.piece_at(Square::new(row, col))
                .map(|p| p.has_moved)
                .expect("piece")
        };
        assert!(!moved(7, 7));
        assert!(!moved(7, 4));
        assert!(moved(7, 0));
        assert!(!moved(0, 0));
        assert!(moved(0, 7));
        assert!(!moved(0, 4));
    }

    #[test]
    fn en_passant_field_flags_the_pushed_pawn() {
        let (game, side) =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", zobrist()).expect("fen");
        assert_eq!(side, Color::Light);
        let pawn = game.piece_at(Square::new(3, 3)).expect("d5 pawn");
        assert!(pawn.en_passant_available);
        assert_eq!(game.en_passant_pawn(), Some(Square::new(3, 3)));
    }
}
