//! Shared state for the parallel root search.
//!
//! Workers each own a private board copy. What they share lives here: the
//! root window (atomic alpha/beta scalars plus a node counter), the
//! transposition table (sharded behind mutexes) and the history counters
//! (relaxed atomics). Nothing in this module touches a board.

use std::sync::{
    atomic::{AtomicI32, AtomicU32, AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::game_state::chess_types::Square;
use crate::search::board_scoring::INFINITY_SCORE;
use crate::search::transposition_table::{TTEntry, TTStats, TranspositionTable};

/// Root window and accounting shared by every worker of one search call.
#[derive(Debug)]
pub struct SharedSearchState {
    alpha: AtomicI32,
    beta: AtomicI32,
    pub nodes_visited: AtomicU64,
}

impl SharedSearchState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            alpha: AtomicI32::new(-INFINITY_SCORE),
            beta: AtomicI32::new(INFINITY_SCORE),
            nodes_visited: AtomicU64::new(0),
        })
    }

    #[inline]
    pub fn alpha(&self) -> i32 {
        self.alpha.load(Ordering::Acquire)
    }

    #[inline]
    pub fn beta(&self) -> i32 {
        self.beta.load(Ordering::Acquire)
    }

    /// Raise the shared alpha to `score` if it improves on it. Returns the
    /// alpha in force afterwards.
    #[inline]
    pub fn raise_alpha(&self, score: i32) -> i32 {
        self.alpha.fetch_max(score, Ordering::AcqRel).max(score)
    }

    #[inline]
    pub fn add_nodes(&self, n: u64) {
        self.nodes_visited.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }
}

/// Thread-safe transposition table façade for shared worker access.
///
/// Keys are spread over independently locked shards so workers rarely
/// contend on the same mutex.
#[derive(Debug)]
pub struct SharedTranspositionTable {
    shards: Vec<Mutex<TranspositionTable>>,
}

impl SharedTranspositionTable {
    pub fn new_with_mb(total_mb: usize, shard_count: usize) -> Arc<Self> {
        let shards = shard_count.max(1);
        let mb_per_shard = (total_mb.max(1) / shards).max(1);
        let shards = (0..shards)
            .map(|_| Mutex::new(TranspositionTable::new_with_mb(mb_per_shard)))
            .collect();
        Arc::new(Self { shards })
    }

    #[inline]
    fn shard(&self, key: u64) -> &Mutex<TranspositionTable> {
        // Low bits index inside a shard, so pick the shard from the high bits.
        let idx = ((key >> 48) as usize) % self.shards.len();
        &self.shards[idx]
    }

    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.shard(key).lock().probe(key)
    }

    pub fn probe_score(&self, key: u64, depth: u8, alpha: i32, beta: i32, ply: u32) -> Option<i32> {
        self.shard(key).lock().probe_score(key, depth, alpha, beta, ply)
    }

    pub fn store(&self, entry: TTEntry) {
        self.shard(entry.key).lock().store(entry);
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }

    pub fn new_generation(&self) {
        for shard in &self.shards {
            shard.lock().new_generation();
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TTStats {
        self.shards
            .iter()
            .map(|shard| shard.lock().stats())
            .fold(TTStats::default(), |mut merged, s| {
                merged.probes += s.probes;
                merged.hits += s.hits;
                merged.stores += s.stores;
                merged
            })
    }
}

/// Per-from-square history counters, bumped by `depth²` on every cutoff.
#[derive(Debug)]
pub struct HistoryTable {
    cells: [AtomicU32; 64],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            cells: std::array::from_fn(|_| AtomicU32::new(0)),
        }
    }
}

impl HistoryTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    fn cell(&self, square: Square) -> &AtomicU32 {
        &self.cells[square.row as usize * 8 + square.col as usize]
    }

    #[inline]
    pub fn bump(&self, from: Square, depth: i32) {
        let depth = depth.max(1) as u32;
        self.cell(from)
            .fetch_add(depth.saturating_mul(depth), Ordering::Relaxed);
    }

    #[inline]
    pub fn score(&self, from: Square) -> u32 {
        self.cell(from).load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        for cell in &self.cells {
            cell.store(0, Ordering::Relaxed);
        }
    }
}
