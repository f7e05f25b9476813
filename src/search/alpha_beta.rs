//! Depth-limited min/max search with alpha-beta pruning.
//!
//! Scores are absolute: always from the point of view of the side the search
//! was started for (the root side). Max nodes are that side to move, min
//! nodes its opponent. Each worker owns one board copy and walks it with
//! probe make/undo; the transposition table, history counters and root
//! window are shared across workers.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move, skip_move, undo_move, undo_skip_move};
use crate::move_generation::legal_move_checks::{in_check, is_game_over};
use crate::moves::move_descriptions::ScoredMove;
use crate::search::board_scoring::{mate_score_at_ply, mate_score_to_tt, BoardScorer, INFINITY_SCORE};
use crate::search::move_ordering::sorted_for_search;
use crate::search::quiescence::{is_quiet, quiescence};
use crate::search::threading::{HistoryTable, SharedSearchState, SharedTranspositionTable};
use crate::search::transposition_table::{Bound, TTEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Nominal depth in plies.
    pub depth: u8,
    /// Parallel root workers.
    pub threads: usize,
    /// Added to `depth` once the end stage is reached.
    pub endgame_depth_bonus: u8,
    /// Real moves that must have been played in a line before a null move
    /// is tried.
    pub null_move_min_ply: u32,
    pub null_move_reduction: u8,
    /// Capture plies followed past the nominal depth; zero disables it.
    pub quiescence_depth: u32,
    pub use_book: bool,
    /// Committed plies after which the opening book is no longer consulted.
    pub book_move_limit: usize,
    pub hash_mb: usize,
    pub hash_shards: usize,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            threads: 4,
            endgame_depth_bonus: 2,
            null_move_min_ply: 4,
            null_move_reduction: 2,
            quiescence_depth: 4,
            use_book: true,
            book_move_limit: 6,
            hash_mb: 16,
            hash_shards: 16,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Depth actually searched for `game_state`, including the end-stage
    /// bonus.
    pub fn effective_depth(&self, game_state: &GameState) -> u8 {
        if game_state.game_stage() == GameStage::End {
            self.depth.saturating_add(self.endgame_depth_bonus)
        } else {
            self.depth
        }
    }
}

/// Counters gathered by one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_cutoffs: u64,
    pub null_moves_tried: u64,
    pub null_move_cutoffs: u64,
    /// Shallowest line length at which a null move was tried.
    pub min_null_move_ply: Option<u32>,
}

/// A root move chosen by one worker.
#[derive(Debug, Clone, Copy)]
pub struct WorkerResult {
    pub best: ScoredMove,
    /// The score was inside the worker's window, not a fail-low bound.
    pub exact: bool,
    pub stats: SearchStats,
}

/// Everything a worker reads but does not own.
pub struct SearchContext<'a, S: BoardScorer> {
    pub scorer: &'a S,
    pub tt: &'a SharedTranspositionTable,
    pub history: &'a HistoryTable,
    pub shared: &'a SharedSearchState,
    pub root_side: Color,
    pub null_move_min_ply: u32,
    pub null_move_reduction: u8,
    pub quiescence_depth: u32,
}

impl<'a, S: BoardScorer> SearchContext<'a, S> {
    pub fn new(
        config: &SearchConfig,
        scorer: &'a S,
        tt: &'a SharedTranspositionTable,
        history: &'a HistoryTable,
        shared: &'a SharedSearchState,
        root_side: Color,
    ) -> Self {
        Self {
            scorer,
            tt,
            history,
            shared,
            root_side,
            null_move_min_ply: config.null_move_min_ply,
            null_move_reduction: config.null_move_reduction,
            quiescence_depth: config.quiescence_depth,
        }
    }
}

/// Table key: the board hash, plus the side key when dark is to move so the
/// same board with the other side to move never aliases. Scores are absolute
/// for the root side, so a search for dark mixes in its own key too.
#[inline]
fn tt_key(game_state: &GameState, side_to_move: Color, root_side: Color) -> u64 {
    let zobrist = game_state.zobrist();
    let mut key = game_state.content_hash();
    if side_to_move == Color::Dark {
        key ^= zobrist.side_to_move_key();
    }
    if root_side == Color::Dark {
        key ^= zobrist.dark_root_key();
    }
    key
}

#[inline]
fn tt_depth(depth: i32) -> u8 {
    depth.clamp(0, i32::from(u8::MAX)) as u8
}

pub struct SearchWorker<'a, S: BoardScorer> {
    ctx: &'a SearchContext<'a, S>,
    rng: StdRng,
    stats: SearchStats,
}

impl<'a, S: BoardScorer> SearchWorker<'a, S> {
    pub fn new(ctx: &'a SearchContext<'a, S>, seed: u64) -> Self {
        Self {
            ctx,
            rng: StdRng::seed_from_u64(seed),
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search every root move of the root side at `depth`, keeping the best
    /// one and publishing improvements to the shared alpha.
    pub fn search_root(&mut self, game_state: &mut GameState, depth: u8) -> Option<WorkerResult> {
        let side = self.ctx.root_side;
        let depth = i32::from(depth.max(1));
        let moves = sorted_for_search(game_state, side, self.ctx.history, &mut self.rng);

        let mut local_alpha = self.ctx.shared.alpha();
        let local_beta = self.ctx.shared.beta();
        let mut best: Option<(ScoredMove, bool)> = None;

        for mut mv in moves {
            make_move(game_state, &mut mv, MoveFlag::Probe);
            let score = self.min_node(game_state, local_alpha, local_beta, depth - 1, 1, true);
            undo_move(game_state, &mv);

            if best.is_none() || score > local_alpha {
                let exact = score > local_alpha;
                best = Some((ScoredMove { chess_move: mv, score }, exact));
                if exact {
                    local_alpha = self.ctx.shared.raise_alpha(score);
                }
            }
            if local_alpha >= local_beta {
                break;
            }
        }

        self.ctx.shared.add_nodes(self.stats.nodes);
        best.map(|(best, exact)| WorkerResult {
            best,
            exact,
            stats: self.stats,
        })
    }

    fn evaluate(&self, game_state: &mut GameState, ply: u32) -> i32 {
        mate_score_at_ply(self.ctx.scorer.score(game_state, self.ctx.root_side), ply)
    }

    /// Depth exhausted: static score, or the capture extension when the
    /// position is not quiet.
    fn leaf(&mut self, game_state: &mut GameState, to_move: Color, alpha: i32, beta: i32, ply: u32) -> i32 {
        if self.ctx.quiescence_depth == 0 || is_quiet(game_state) {
            return self.evaluate(game_state, ply);
        }
        let mut nodes = 0;
        let score = if to_move == self.ctx.root_side {
            quiescence(
                game_state,
                self.ctx.scorer,
                to_move,
                alpha,
                beta,
                self.ctx.quiescence_depth,
                ply,
                &mut nodes,
            )
        } else {
            -quiescence(
                game_state,
                self.ctx.scorer,
                to_move,
                -beta,
                -alpha,
                self.ctx.quiescence_depth,
                ply,
                &mut nodes,
            )
        };
        self.stats.nodes += nodes;
        score
    }

    fn null_move_allowed(&mut self, game_state: &GameState, to_move: Color, allow_null: bool, ply: u32) -> bool {
        if !allow_null || ply < self.ctx.null_move_min_ply || in_check(game_state, to_move) {
            return false;
        }
        self.stats.null_moves_tried += 1;
        self.stats.min_null_move_ply = Some(self.stats.min_null_move_ply.map_or(ply, |p| p.min(ply)));
        true
    }

    fn max_node(
        &mut self,
        game_state: &mut GameState,
        mut alpha: i32,
        beta: i32,
        depth: i32,
        ply: u32,
        allow_null: bool,
    ) -> i32 {
        self.stats.nodes += 1;
        let side = self.ctx.root_side;
        if depth <= 0 {
            return self.leaf(game_state, side, alpha, beta, ply);
        }
        if is_game_over(game_state) {
            return self.evaluate(game_state, ply);
        }

        let key = tt_key(game_state, side, self.ctx.root_side);
        if let Some(score) = self.ctx.tt.probe_score(key, tt_depth(depth), alpha, beta, ply) {
            self.stats.tt_cutoffs += 1;
            return score;
        }

        if self.null_move_allowed(game_state, side, allow_null, ply) {
            skip_move(game_state);
            let reduced = depth - i32::from(self.ctx.null_move_reduction);
            let score = self.min_node(game_state, beta - 1, beta, reduced, ply, false);
            undo_skip_move(game_state);
            if score >= beta {
                self.stats.null_move_cutoffs += 1;
                return beta;
            }
        }

        let alpha_orig = alpha;
        let mut best = -INFINITY_SCORE;
        for mut mv in sorted_for_search(game_state, side, self.ctx.history, &mut self.rng) {
            make_move(game_state, &mut mv, MoveFlag::Probe);
            let score = self.min_node(game_state, alpha, beta, depth - 1, ply + 1, true);
            undo_move(game_state, &mv);

            best = best.max(score);
            alpha = alpha.max(best);
            if beta <= alpha {
                self.ctx.history.bump(mv.from, depth);
                break;
            }
        }

        self.ctx.tt.store(TTEntry {
            key,
            depth: tt_depth(depth),
            score: mate_score_to_tt(best, ply),
            bound: Bound::from_window(best, alpha_orig, beta),
        });
        best
    }

    fn min_node(
        &mut self,
        game_state: &mut GameState,
        alpha: i32,
        mut beta: i32,
        depth: i32,
        ply: u32,
        allow_null: bool,
    ) -> i32 {
        self.stats.nodes += 1;
        let side = self.ctx.root_side.opposite();
        if depth <= 0 {
            return self.leaf(game_state, side, alpha, beta, ply);
        }
        if is_game_over(game_state) {
            return self.evaluate(game_state, ply);
        }

        let key = tt_key(game_state, side, self.ctx.root_side);
        if let Some(score) = self.ctx.tt.probe_score(key, tt_depth(depth), alpha, beta, ply) {
            self.stats.tt_cutoffs += 1;
            return score;
        }

        if self.null_move_allowed(game_state, side, allow_null, ply) {
            skip_move(game_state);
            let reduced = depth - i32::from(self.ctx.null_move_reduction);
            let score = self.max_node(game_state, alpha, alpha + 1, reduced, ply, false);
            undo_skip_move(game_state);
            if score <= alpha {
                self.stats.null_move_cutoffs += 1;
                return alpha;
            }
        }

        let beta_orig = beta;
        let mut best = INFINITY_SCORE;
        for mut mv in sorted_for_search(game_state, side, self.ctx.history, &mut self.rng) {
            make_move(game_state, &mut mv, MoveFlag::Probe);
            let score = self.max_node(game_state, alpha, beta, depth - 1, ply + 1, true);
            undo_move(game_state, &mv);

            best = best.min(score);
            beta = beta.min(best);
            if beta <= alpha {
                self.ctx.history.bump(mv.from, depth);
                break;
            }
        }

        self.ctx.tt.store(TTEntry {
            key,
            depth: tt_depth(depth),
            score: mate_score_to_tt(best, ply),
            bound: Bound::from_window(best, alpha, beta_orig),
        });
        best
    }
}
