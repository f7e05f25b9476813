//! Mailbox board state.
//!
//! `GameState` is the central model for the engine: an 8×8 grid of optional
//! pieces plus the bookkeeping needed for committed play (notation, repetition
//! counts, last move) and for null-move search (skip counter). It is mutated
//! in place through `make_move`/`undo_move` and deep-copied once per search
//! worker.

use std::collections::HashMap;
use std::sync::Arc;

use crate::game_state::chess_rules::{game_stage_for_piece_count, BACK_RANK_LAYOUT};
use crate::game_state::chess_types::*;
use crate::game_state::piece::Piece;
use crate::moves::move_descriptions::ChessMove;
use crate::moves::pawn_moves::pawn_start_row;
use crate::search::zobrist::ZobristTable;

#[derive(Debug, Clone)]
pub struct GameState {
    board: [[Option<Piece>; 8]; 8],
    /// Square of the pawn that may currently be captured en passant.
    en_passant_pawn: Option<Square>,

    // --- Committed-play history ---
    repetition_counts: HashMap<u64, u32>,
    notation: Vec<String>,
    last_move: Option<ChessMove>,

    // --- Null-move support ---
    skipped_moves: u32,

    zobrist: Arc<ZobristTable>,
}

impl GameState {
    /// Empty board hashed with `zobrist`.
    pub fn new_empty(zobrist: Arc<ZobristTable>) -> Self {
        Self {
            board: [[None; 8]; 8],
            en_passant_pawn: None,
            repetition_counts: HashMap::new(),
            notation: Vec::new(),
            last_move: None,
            skipped_moves: 0,
            zobrist,
        }
    }

    /// Standard initial layout.
    pub fn new_game(zobrist: Arc<ZobristTable>) -> Self {
        let mut game_state = Self::new_empty(zobrist);
        for color in [Color::Light, Color::Dark] {
            let home = color.home_row();
            let pawns = pawn_start_row(color);
            for (col, kind) in BACK_RANK_LAYOUT.into_iter().enumerate() {
                let col = col as u8;
                game_state.place_piece(Piece::new(kind, color, Square::new(home, col)));
                game_state.place_piece(Piece::new(
                    PieceKind::Pawn,
                    color,
                    Square::new(pawns, col),
                ));
            }
        }
        game_state.record_position();
        game_state
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row as usize][square.col as usize]
    }

    #[inline]
    pub(crate) fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.board[square.row as usize][square.col as usize].as_mut()
    }

    /// Put `piece` on its own `square`, replacing any occupant.
    #[inline]
    pub fn place_piece(&mut self, piece: Piece) {
        self.board[piece.square.row as usize][piece.square.col as usize] = Some(piece);
    }

    #[inline]
    pub fn take_piece(&mut self, square: Square) -> Option<Piece> {
        self.board[square.row as usize][square.col as usize].take()
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.board.iter().flatten().filter_map(|cell| *cell)
    }

    pub fn team_pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn king(&self, color: Color) -> Option<Piece> {
        self.team_pieces(color)
            .find(|piece| piece.kind == PieceKind::King)
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    #[inline]
    pub fn game_stage(&self) -> GameStage {
        game_stage_for_piece_count(self.piece_count())
    }

    /// XOR of the Zobrist keys of every occupied square. Depends on board
    /// contents only, not on side to move or history.
    pub fn content_hash(&self) -> u64 {
        self.pieces()
            .fold(0u64, |hash, piece| hash ^ self.zobrist.piece_key(&piece))
    }

    #[inline]
    pub fn zobrist(&self) -> &Arc<ZobristTable> {
        &self.zobrist
    }

    #[inline]
    pub fn en_passant_pawn(&self) -> Option<Square> {
        self.en_passant_pawn
    }

    #[inline]
    pub(crate) fn set_en_passant_pawn(&mut self, square: Option<Square>) {
        self.en_passant_pawn = square;
    }

    /// Notation of every committed move, oldest first.
    #[inline]
    pub fn notation(&self) -> &[String] {
        &self.notation
    }

    #[inline]
    pub fn last_move(&self) -> Option<&ChessMove> {
        self.last_move.as_ref()
    }

    #[inline]
    pub fn skipped_moves(&self) -> u32 {
        self.skipped_moves
    }

    #[inline]
    pub fn repetition_count(&self, hash: u64) -> u32 {
        self.repetition_counts.get(&hash).copied().unwrap_or(0)
    }

    /// Current board has appeared three or more times among committed moves.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count(self.content_hash()) >= 3
    }

    pub(crate) fn record_commit(&mut self, chess_move: ChessMove, notation: String) {
        self.notation.push(notation);
        self.last_move = Some(chess_move);
        self.record_position();
    }

    pub(crate) fn record_position(&mut self) {
        let hash = self.content_hash();
        *self.repetition_counts.entry(hash).or_insert(0) += 1;
    }

    #[inline]
    pub(crate) fn increment_skipped(&mut self) {
        self.skipped_moves += 1;
    }

    #[inline]
    pub(crate) fn decrement_skipped(&mut self) {
        self.skipped_moves = self.skipped_moves.saturating_sub(1);
    }
}

/// Positions compare by board contents (occupant and per-piece flags on
/// every square) and pending en-passant target; history is ignored.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.en_passant_pawn == other.en_passant_pawn
    }
}

impl Eq for GameState {}
