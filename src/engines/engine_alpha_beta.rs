//! Fixed-depth parallel alpha-beta engine.
//!
//! Each call optionally takes a book move, otherwise spawns `threads`
//! workers that search every root move on their own copy of the position.
//! Workers share one transposition table, one history table and the root
//! alpha, and use different move-shuffling seeds so they diverge. The
//! caller blocks until every worker has reported; the best-scored move wins.

use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::engines::engine_trait::{Engine, EngineOutput};
use crate::errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::search::alpha_beta::{SearchConfig, SearchContext, SearchStats, SearchWorker, WorkerResult};
use crate::search::board_scoring::BoardScorer;
use crate::search::heuristic_scoring::HeuristicScorer;
use crate::search::threading::{HistoryTable, SharedSearchState, SharedTranspositionTable};
use crate::tables::opening_book::OpeningBook;
use crate::utils::notation::move_to_notation;

pub struct AlphaBetaEngine<S: BoardScorer> {
    config: SearchConfig,
    scorer: S,
    book: OpeningBook,
    tt: Arc<SharedTranspositionTable>,
    history: Arc<HistoryTable>,
    rng: StdRng,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ChessErrors::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

fn parse_switch(name: &str, value: &str) -> ChessResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ChessErrors::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        }),
    }
}

/// Highest score wins; on equal scores a result that was inside its
/// worker's window beats a fail-low bound.
fn aggregate(results: impl IntoIterator<Item = WorkerResult>) -> Option<WorkerResult> {
    results.into_iter().fold(None, |best: Option<WorkerResult>, candidate| match best {
        Some(best)
            if best.best.score > candidate.best.score
                || (best.best.score == candidate.best.score && (best.exact || !candidate.exact)) =>
        {
            Some(best)
        }
        _ => Some(candidate),
    })
}

impl AlphaBetaEngine<HeuristicScorer> {
    /// Engine with the weighted heuristic evaluation.
    pub fn standard(config: SearchConfig) -> Self {
        Self::new(config, HeuristicScorer::default())
    }
}

impl<S: BoardScorer> AlphaBetaEngine<S> {
    pub fn new(config: SearchConfig, scorer: S) -> Self {
        let book = if config.use_book {
            OpeningBook::load_default()
        } else {
            OpeningBook::default()
        };
        Self {
            tt: SharedTranspositionTable::new_with_mb(config.hash_mb, config.hash_shards),
            history: HistoryTable::new(),
            rng: rng_for(config.seed),
            config,
            scorer,
            book,
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn transposition_table(&self) -> &SharedTranspositionTable {
        &self.tt
    }

    #[inline]
    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    /// Choose a move for `side` and commit it to `game_state`.
    pub fn play_move(&mut self, game_state: &mut GameState, side: Color) -> ChessResult<EngineOutput> {
        let mut out = self.choose_move(game_state, side)?;
        if let Some(mut mv) = out.best_move {
            make_move(game_state, &mut mv, MoveFlag::Committed);
            out.best_move = Some(mv);
        }
        Ok(out)
    }

    fn book_move(&mut self, root: &mut GameState, side: Color) -> Option<EngineOutput> {
        if !self.config.use_book || root.notation().len() >= self.config.book_move_limit {
            return None;
        }
        let mv = self.book.next_book_move(root, side, &mut self.rng)?;
        let notation = move_to_notation(&mv);
        info!(side = ?side, book_move = %notation, "opening book move");
        Some(EngineOutput {
            best_move: Some(mv),
            score: 0,
            from_book: true,
            info_lines: vec![format!("info string opening book move {notation}")],
        })
    }

    fn run_workers(&mut self, root: &GameState, side: Color, depth: u8) -> (Vec<WorkerResult>, u64) {
        let base_seed: u64 = self.rng.random();
        let threads = self.config.threads.max(1);
        let shared = SharedSearchState::new();
        let ctx = SearchContext::new(&self.config, &self.scorer, &self.tt, &self.history, &shared, side);

        let results = thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|id| {
                    let ctx = &ctx;
                    let mut board = root.clone();
                    let seed = base_seed.wrapping_add(id as u64);
                    scope.spawn(move || {
                        debug!(worker = id, depth, "search worker started");
                        let mut worker = SearchWorker::new(ctx, seed);
                        let result = worker.search_root(&mut board, depth);
                        debug!(worker = id, nodes = worker.stats().nodes, "search worker finished");
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .filter_map(|(id, handle)| match handle.join() {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(worker = id, "search worker panicked, dropping its result");
                        None
                    }
                })
                .collect::<Vec<_>>()
        });
        (results, shared.nodes())
    }
}

impl<S: BoardScorer> Engine for AlphaBetaEngine<S> {
    fn new_game(&mut self) {
        self.tt.clear();
        self.history.clear();
        self.rng = rng_for(self.config.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Depth") {
            let depth: u8 = parse_option(name, value)?;
            if depth == 0 {
                return Err(ChessErrors::InvalidOption {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
            }
            self.config.depth = depth;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Threads") {
            let threads: usize = parse_option(name, value)?;
            self.config.threads = threads.max(1);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            let hash_mb: usize = parse_option(name, value)?;
            self.config.hash_mb = hash_mb.max(1);
            self.tt = SharedTranspositionTable::new_with_mb(self.config.hash_mb, self.config.hash_shards);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("OwnBook") {
            self.config.use_book = parse_switch(name, value)?;
            if self.config.use_book && self.book.is_empty() {
                self.book = OpeningBook::load_default();
            }
            return Ok(());
        }
        if name.eq_ignore_ascii_case("BookMoveLimit") {
            self.config.book_move_limit = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("NullMoveMinPly") {
            self.config.null_move_min_ply = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("QuiescenceDepth") {
            self.config.quiescence_depth = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Seed") {
            let seed: u64 = parse_option(name, value)?;
            self.config.seed = Some(seed);
            self.rng = StdRng::seed_from_u64(seed);
            return Ok(());
        }
        Err(ChessErrors::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, game_state: &GameState, side: Color) -> ChessResult<EngineOutput> {
        let mut root = game_state.clone();
        if !has_legal_move(&mut root, side) {
            return Err(ChessErrors::NoLegalMoves(side));
        }
        if let Some(out) = self.book_move(&mut root, side) {
            return Ok(out);
        }

        let depth = self.config.effective_depth(&root);
        self.tt.new_generation();
        let threads = self.config.threads.max(1);
        let (results, nodes) = self.run_workers(&root, side, depth);
        if results.is_empty() {
            return Err(ChessErrors::SearchWorkersFailed(threads));
        }

        let totals = results.iter().fold(SearchStats::default(), |acc, r| SearchStats {
            nodes: acc.nodes + r.stats.nodes,
            tt_cutoffs: acc.tt_cutoffs + r.stats.tt_cutoffs,
            null_moves_tried: acc.null_moves_tried + r.stats.null_moves_tried,
            null_move_cutoffs: acc.null_move_cutoffs + r.stats.null_move_cutoffs,
            min_null_move_ply: match (acc.min_null_move_ply, r.stats.min_null_move_ply) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        });
        let reported = results.len();
        let best = aggregate(results).ok_or(ChessErrors::SearchWorkersFailed(threads))?;

        let notation = move_to_notation(&best.best.chess_move);
        let tt_stats = self.tt.stats();
        info!(
            side = ?side,
            best_move = %notation,
            score = best.best.score,
            depth,
            nodes,
            workers = reported,
            "search finished"
        );
        debug!(
            probes = tt_stats.probes,
            hits = tt_stats.hits,
            stores = tt_stats.stores,
            entries = self.tt.len(),
            "transposition table"
        );

        let mut info_lines = vec![
            format!(
                "info depth {depth} score cp {} nodes {nodes} pv {notation}",
                best.best.score
            ),
            format!("info string workers {reported}/{threads}"),
            format!(
                "info string null_moves tried {} cutoffs {} tt_cutoffs {}",
                totals.null_moves_tried, totals.null_move_cutoffs, totals.tt_cutoffs
            ),
            format!(
                "info string tt probes {} hits {} stores {} size_entries {}",
                tt_stats.probes,
                tt_stats.hits,
                tt_stats.stores,
                self.tt.len()
            ),
        ];
        if let Some(ply) = totals.min_null_move_ply {
            info_lines.push(format!("info string null_move min_ply {ply}"));
        }

        Ok(EngineOutput {
            best_move: Some(best.best.chess_move),
            score: best.best.score,
            from_book: false,
            info_lines,
        })
    }
}
