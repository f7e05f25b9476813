//! Weighted multi-term evaluator.
//!
//! Every term is computed for one side at a time; the scorer returns
//! `Σ weight × (term(side) − term(opponent))`. Stage-dependent terms read the
//! stage from the piece count once per call.

use crate::game_state::chess_rules::QUEEN_START_COL;
use crate::game_state::{chess_types::*, game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_checks::{attackers_to_square, in_check, is_attacked};
use crate::move_generation::move_generator::generate_team_pseudo_legal_moves;
use crate::moves::pawn_moves::{pawn_direction, promotion_distance};
use crate::moves::sliding_moves::{first_blocker, BISHOP_DIRECTIONS};
use crate::search::board_scoring::{terminal_score, BoardScorer, MaterialScorer};

const CENTER_SQUARES: [Square; 4] = [
    Square::new(3, 3),
    Square::new(3, 4),
    Square::new(4, 3),
    Square::new(4, 4),
];

const QUEEN_START_SCORE: i32 = 50;
const CHECK_SCORE: i32 = 50;
const BISHOP_OPEN_DIAGONAL_SCORE: i32 = 35;
const CENTER_PAWN_DEVELOPMENT_SCORE: i32 = 30;
const EDGE_KNIGHT_PENALTY: i32 = 25;
const KING_CASTLED_SCORE: i32 = 100;
const KING_UNCASTLED_MOVED_PENALTY: i32 = 100;
const KING_EDGE_SCORE: i32 = 25;
const KING_SHIELD_PAWN_SCORE: i32 = 15;
const KING_SHIELD_PIECE_SCORE: i32 = 10;
const CENTER_PAWN_SCORE: i32 = 35;
const CENTER_PIECE_SCORE: i32 = 10;
const CENTER_ATTACK_SCORE: i32 = 15;
const ENEMY_KING_ON_EDGE_SCORE: i32 = 200;
const MOBILITY_MULTIPLIER: i32 = 5;
const ROOK_OPEN_FILE_SCORE: i32 = 30;
const KNIGHT_CENTER_SCORE: i32 = 20;
const PASSED_PAWN_SCORE: i32 = 25;
const DOUBLED_PAWN_PENALTY: i32 = 25;
const CONNECTED_PAWN_SCORE: i32 = 10;
const PROMOTION_DISTANCE_SCORE: i32 = 10;
const NEAR_PROMOTION_SCORE: i32 = 90;

/// Per-term multipliers for [`HeuristicScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationWeights {
    pub material: i32,
    pub pawn_structure: i32,
    /// Replaces `pawn_structure` once the end stage is reached.
    pub endgame_pawn_structure: i32,
    pub development: i32,
    pub queen_opening: i32,
    pub bishop_vision: i32,
    pub king_safety: i32,
    pub promotion: i32,
    pub center: i32,
    pub king_to_edge: i32,
    pub mobility: i32,
    pub rook_open_file: i32,
    pub check: i32,
    pub king_tropism: i32,
    pub coordination: i32,
    pub knight_centralization: i32,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            material: 2,
            pawn_structure: 1,
            endgame_pawn_structure: 2,
            development: 1,
            queen_opening: 1,
            bishop_vision: 1,
            king_safety: 2,
            promotion: 2,
            center: 2,
            king_to_edge: 2,
            mobility: 1,
            rook_open_file: 1,
            check: 1,
            king_tropism: 1,
            coordination: 2,
            knight_centralization: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer {
    pub weights: EvaluationWeights,
}

impl HeuristicScorer {
    pub const fn with_weights(weights: EvaluationWeights) -> Self {
        Self { weights }
    }

    /// The weighted composite without the terminal short-circuit.
    pub fn composite(&self, game_state: &GameState, side: Color) -> i32 {
        let w = &self.weights;
        let stage = game_state.game_stage();
        let pawn_weight = if stage == GameStage::End {
            w.endgame_pawn_structure
        } else {
            w.pawn_structure
        };

        let diff = |weight: i32, term: &dyn Fn(&GameState, Color, GameStage) -> i32| {
            if weight == 0 {
                return 0;
            }
            weight * (term(game_state, side, stage) - term(game_state, side.opposite(), stage))
        };

        diff(w.material, &|gs, color, _| MaterialScorer::material(gs, color))
            + diff(pawn_weight, &pawn_structure_term)
            + diff(w.development, &development_term)
            + diff(w.queen_opening, &queen_opening_term)
            + diff(w.bishop_vision, &|gs, color, _| bishop_vision_term(gs, color))
            + diff(w.king_safety, &king_safety_term)
            + diff(w.promotion, &|gs, color, _| promotion_term(gs, color))
            + diff(w.center, &center_term)
            + diff(w.king_to_edge, &king_to_edge_term)
            + diff(w.mobility, &|gs, color, _| mobility_term(gs, color))
            + diff(w.rook_open_file, &|gs, color, _| rook_open_file_term(gs, color))
            + diff(w.check, &|gs, color, _| check_term(gs, color))
            + diff(w.king_tropism, &|gs, color, _| king_tropism_term(gs, color))
            + diff(w.coordination, &|gs, color, _| coordination_term(gs, color))
            + diff(w.knight_centralization, &|gs, color, _| {
                knight_centralization_term(gs, color)
            })
    }
}

impl BoardScorer for HeuristicScorer {
    fn score(&self, game_state: &mut GameState, side: Color) -> i32 {
        terminal_score(game_state, side).unwrap_or_else(|| self.composite(game_state, side))
    }
}

fn pieces_of(game_state: &GameState, color: Color, kind: PieceKind) -> impl Iterator<Item = Piece> + '_ {
    game_state
        .team_pieces(color)
        .filter(move |piece| piece.kind == kind)
}

fn is_pawn_of(piece: Option<Piece>, color: Color) -> bool {
    piece.is_some_and(|p| p.kind == PieceKind::Pawn && p.color == color)
}

/// Squares strictly ahead of `square` on `col`, in the pawn direction of
/// `color`.
fn squares_ahead(color: Color, square: Square, col: u8) -> impl Iterator<Item = Square> {
    let dir = pawn_direction(color);
    (1..8i8).map_while(move |step| Square::new(square.row, col).offset(dir * step, 0))
}

/// Connected, passed and doubled pawns, plus promotion distance in the end
/// stage.
fn pawn_structure_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    let mut score = 0;
    for pawn in pieces_of(game_state, color, PieceKind::Pawn) {
        let square = pawn.square;

        let connected = [(-1i8, -1i8), (-1, 1), (1, -1), (1, 1)]
            .into_iter()
            .filter_map(|(dr, dc)| square.offset(dr, dc))
            .filter(|sq| is_pawn_of(game_state.piece_at(*sq), color))
            .count() as i32;
        score += connected * CONNECTED_PAWN_SCORE;

        let enemy = color.opposite();
        let passed = [-1i8, 0, 1]
            .into_iter()
            .filter_map(|dc| square.offset(0, dc))
            .all(|file| {
                squares_ahead(color, square, file.col)
                    .all(|sq| !is_pawn_of(game_state.piece_at(sq), enemy))
            });
        if passed {
            score += PASSED_PAWN_SCORE;
        }

        if squares_ahead(color, square, square.col).any(|sq| is_pawn_of(game_state.piece_at(sq), color)) {
            score -= DOUBLED_PAWN_PENALTY;
        }

        if stage == GameStage::End {
            score += (7 - promotion_distance(color, square) as i32) * PROMOTION_DISTANCE_SCORE;
        }
    }
    score
}

/// Opening only: central pawns are rewarded, knights on the rim punished.
fn development_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    if stage != GameStage::Opening {
        return 0;
    }
    let pawns = CENTER_SQUARES
        .iter()
        .filter(|sq| is_pawn_of(game_state.piece_at(**sq), color))
        .count() as i32;
    let rim_knights = pieces_of(game_state, color, PieceKind::Knight)
        .filter(|knight| knight.square.is_edge())
        .count() as i32;
    pawns * CENTER_PAWN_DEVELOPMENT_SCORE - rim_knights * EDGE_KNIGHT_PENALTY
}

/// Opening only: bonus while the queen still sits on its start square.
fn queen_opening_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    if stage != GameStage::Opening {
        return 0;
    }
    let start = Square::new(color.home_row(), QUEEN_START_COL);
    match game_state.piece_at(start) {
        Some(piece) if piece.kind == PieceKind::Queen && piece.color == color => QUEEN_START_SCORE,
        _ => 0,
    }
}

fn bishop_vision_term(game_state: &GameState, color: Color) -> i32 {
    pieces_of(game_state, color, PieceKind::Bishop)
        .filter(|bishop| {
            BISHOP_DIRECTIONS
                .into_iter()
                .all(|dir| first_blocker(game_state, bishop.square, dir).is_none())
        })
        .count() as i32
        * BISHOP_OPEN_DIAGONAL_SCORE
}

/// Castling status, home-row and wing placement, and the three squares in
/// front of the king. Off in the end stage.
fn king_safety_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    if stage == GameStage::End {
        return 0;
    }
    let Some(king) = game_state.king(color) else {
        return 0;
    };

    let mut score = 0;
    if king.has_castled {
        score += KING_CASTLED_SCORE;
    } else if king.has_moved {
        score -= KING_UNCASTLED_MOVED_PENALTY;
    }
    if king.square.row == color.home_row() {
        score += KING_EDGE_SCORE;
    }
    if king.square.col < 2 || king.square.col > 5 {
        score += KING_EDGE_SCORE;
    }

    let forward = pawn_direction(color);
    for d_col in [-1i8, 0, 1] {
        let shield = king
            .square
            .offset(forward, d_col)
            .and_then(|sq| game_state.piece_at(sq))
            .filter(|piece| piece.color == color);
        if let Some(piece) = shield {
            score += if piece.kind == PieceKind::Pawn {
                KING_SHIELD_PAWN_SCORE
            } else {
                KING_SHIELD_PIECE_SCORE
            };
        }
    }
    score
}

/// Pawns a single push away from promoting.
fn promotion_term(game_state: &GameState, color: Color) -> i32 {
    pieces_of(game_state, color, PieceKind::Pawn)
        .filter(|pawn| promotion_distance(color, pawn.square) == 1)
        .count() as i32
        * NEAR_PROMOTION_SCORE
}

/// Occupation and control of d4, e4, d5 and e5, doubled in the opening.
fn center_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    let multiplier = if stage == GameStage::Opening { 2 } else { 1 };
    let mut score = 0;
    for square in CENTER_SQUARES {
        match game_state.piece_at(square) {
            Some(piece) if piece.color == color && piece.kind == PieceKind::Pawn => {
                score += CENTER_PAWN_SCORE;
            }
            Some(piece) if piece.color == color => score += CENTER_PIECE_SCORE,
            _ => {}
        }
        if is_attacked(game_state, square, color) {
            score += CENTER_ATTACK_SCORE;
        }
    }
    score * multiplier
}

/// End stage only: reward having the opposing king pushed to the rim.
fn king_to_edge_term(game_state: &GameState, color: Color, stage: GameStage) -> i32 {
    if stage != GameStage::End {
        return 0;
    }
    match game_state.king(color.opposite()) {
        Some(king) if king.square.is_edge() => ENEMY_KING_ON_EDGE_SCORE,
        _ => 0,
    }
}

fn mobility_term(game_state: &GameState, color: Color) -> i32 {
    let mut moves = Vec::with_capacity(48);
    generate_team_pseudo_legal_moves(game_state, color, &mut moves);
    moves.len() as i32 * MOBILITY_MULTIPLIER
}

/// Rooks alone on their file.
fn rook_open_file_term(game_state: &GameState, color: Color) -> i32 {
    pieces_of(game_state, color, PieceKind::Rook)
        .filter(|rook| {
            (0..8u8)
                .filter(|row| *row != rook.square.row)
                .all(|row| game_state.piece_at(Square::new(row, rook.square.col)).is_none())
        })
        .count() as i32
        * ROOK_OPEN_FILE_SCORE
}

fn check_term(game_state: &GameState, color: Color) -> i32 {
    if in_check(game_state, color.opposite()) {
        CHECK_SCORE
    } else {
        0
    }
}

#[inline]
const fn tropism_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Queen => 2,
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight => 1,
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

#[inline]
const fn coordination_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Queen => 10,
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight => 5,
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

/// Pressure on the enemy king: closer pieces count more.
fn king_tropism_term(game_state: &GameState, color: Color) -> i32 {
    let Some(enemy_king) = game_state.king(color.opposite()) else {
        return 0;
    };
    game_state
        .team_pieces(color)
        .map(|piece| {
            let closeness = 7 - piece.square.chebyshev_distance(enemy_king.square) as i32;
            closeness * tropism_weight(piece.kind)
        })
        .sum()
}

/// Every own piece scores the weights of the own pieces defending it.
fn coordination_term(game_state: &GameState, color: Color) -> i32 {
    game_state
        .team_pieces(color)
        .map(|piece| {
            attackers_to_square(game_state, piece.square, color)
                .iter()
                .map(|defender| coordination_weight(defender.kind))
                .sum::<i32>()
        })
        .sum()
}

fn knight_centralization_term(game_state: &GameState, color: Color) -> i32 {
    pieces_of(game_state, color, PieceKind::Knight)
        .filter(|knight| (2..=5).contains(&knight.square.row) && (2..=5).contains(&knight.square.col))
        .count() as i32
        * KNIGHT_CENTER_SCORE
}
