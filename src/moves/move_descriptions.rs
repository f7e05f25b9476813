//! Move records produced by generation and consumed by make/undo.

use crate::game_state::chess_rules::KING_START_COL;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::game_state::piece::Piece;

/// Classification assigned once by the legality pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Illegal,
    Legal,
    Capture,
    Promotion,
    Castle,
    Check,
    Checkmate,
}

impl MoveType {
    /// Buckets emitted ahead of plain legal moves when ordering, highest first.
    pub const PRIORITY: [MoveType; 5] = [
        MoveType::Checkmate,
        MoveType::Capture,
        MoveType::Promotion,
        MoveType::Check,
        MoveType::Castle,
    ];
}

/// A single transition plus the bookkeeping needed to undo it exactly.
///
/// `piece` is a snapshot of the mover taken when the move was generated.
/// The restoration fields (`mover_had_moved`, `captured_had_moved`,
/// `cleared_en_passant`) are written by `make_move` and read by `undo_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub move_type: MoveType,
    pub promotion: Option<PieceKind>,
    pub is_en_passant: bool,
    pub gives_check: bool,
    pub mover_had_moved: bool,
    pub captured_had_moved: bool,
    pub cleared_en_passant: Option<Square>,
}

impl ChessMove {
    /// Unclassified quiet move of `piece` to `to`.
    pub fn new(piece: Piece, to: Square) -> Self {
        Self {
            from: piece.square,
            to,
            piece,
            captured: None,
            move_type: MoveType::Legal,
            promotion: None,
            is_en_passant: false,
            gives_check: false,
            mover_had_moved: piece.has_moved,
            captured_had_moved: false,
            cleared_en_passant: None,
        }
    }

    #[inline]
    pub fn capturing(mut self, victim: Piece) -> Self {
        self.captured = Some(victim);
        self
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// King stepping two files from its start column.
    #[inline]
    pub fn is_castle(&self) -> bool {
        self.piece.kind == PieceKind::King
            && self.from.col == KING_START_COL
            && self.from.col.abs_diff(self.to.col) == 2
    }

    #[inline]
    pub fn is_double_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.from.row.abs_diff(self.to.row) == 2
    }

    /// Most-valuable-victim minus attacker value; zero for quiet moves.
    #[inline]
    pub fn mvv_lva(&self) -> i32 {
        self.captured
            .map_or(0, |victim| victim.value() - self.piece.value())
    }
}

/// A move with a transient heuristic score used during root aggregation.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMove {
    pub chess_move: ChessMove,
    pub score: i32,
}
