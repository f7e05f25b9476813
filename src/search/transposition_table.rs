//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! This table uses direct indexing with depth-preferred replacement and
//! generation aging to evict stale entries. A stored score is only handed
//! back for requests no deeper than the depth it was searched to, and only
//! when its bound is usable for the caller's window.

use crate::search::board_scoring::mate_score_from_tt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Search failed high: the true score is at least `score`.
    Lower,
    /// Search failed low: the true score is at most `score`.
    Upper,
}

impl Bound {
    /// Classify a result against the window it was searched with.
    #[inline]
    pub fn from_window(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
}

impl TTEntry {
    /// Score to reuse for a `depth`-deep search over `(alpha, beta)`, if any.
    #[inline]
    pub fn usable_score(&self, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    generations: Vec<u8>,
    current_generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    const AGE_REPLACE_THRESHOLD: u8 = 4;
    const DEPTH_REPLACE_MARGIN: u8 = 2;

    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        Self::with_entries(bytes / std::mem::size_of::<Option<TTEntry>>().max(1))
    }

    pub fn with_entries(count: usize) -> Self {
        let count = count.max(1);
        Self {
            entries: vec![None; count],
            generations: vec![0; count],
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Advance the generation (once per root search).
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.generations.fill(0);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
            self.generations[idx] = self.current_generation;
        }
        hit
    }

    /// Probe and apply the depth and bound rules in one step. Mate scores
    /// are stored relative to the node and come back relative to the root
    /// of a search that reached the node at `ply`.
    #[inline]
    pub fn probe_score(&mut self, key: u64, depth: u8, alpha: i32, beta: i32, ply: u32) -> Option<i32> {
        self.probe(key).and_then(|entry| {
            TTEntry {
                score: mate_score_from_tt(entry.score, ply),
                ..entry
            }
            .usable_score(depth, alpha, beta)
        })
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        match self.entries[idx] {
            None => {
                self.entries[idx] = Some(entry);
                self.generations[idx] = self.current_generation;
            }
            Some(existing) => {
                let same_key = existing.key == entry.key;
                let age = self.current_generation.wrapping_sub(self.generations[idx]);
                let stale = age >= Self::AGE_REPLACE_THRESHOLD;

                let replace = if same_key {
                    entry.depth >= existing.depth
                } else {
                    stale
                        || entry.depth.saturating_add(Self::DEPTH_REPLACE_MARGIN) >= existing.depth
                };

                if replace {
                    self.entries[idx] = Some(entry);
                    self.generations[idx] = self.current_generation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TTEntry, TranspositionTable};
    use crate::search::board_scoring::{mate_score_to_tt, MATE_SCORE};

    fn exact(key: u64, depth: u8, score: i32) -> TTEntry {
        TTEntry {
            key,
            depth,
            score,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(exact(123, 5, 42));
        let got = tt.probe(123).expect("entry should exist");
        assert_eq!(got.depth, 5);
        assert_eq!(got.score, 42);
        assert!(tt.probe(124).is_none());
        assert_eq!(tt.stats().hits, 1);
    }

    #[test]
    fn deeper_requests_never_see_shallower_scores() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(exact(9, 3, 77));
        assert_eq!(tt.probe_score(9, 1, -100, 100, 0), Some(77));
        assert_eq!(tt.probe_score(9, 3, -100, 100, 0), Some(77));
        for depth in 4..=10 {
            assert_eq!(tt.probe_score(9, depth, -100, 100, 0), None);
        }
    }

    #[test]
    fn bounds_only_answer_compatible_windows() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(TTEntry {
            key: 1,
            depth: 4,
            score: 50,
            bound: Bound::Lower,
        });
        tt.store(TTEntry {
            key: 2,
            depth: 4,
            score: -50,
            bound: Bound::Upper,
        });

        assert_eq!(tt.probe_score(1, 2, 0, 40, 0), Some(50));
        assert_eq!(tt.probe_score(1, 2, 0, 60, 0), None);
        assert_eq!(tt.probe_score(2, 2, -40, 0, 0), Some(-50));
        assert_eq!(tt.probe_score(2, 2, -60, 0, 0), None);
    }

    #[test]
    fn mate_distance_follows_the_node() {
        let mut tt = TranspositionTable::new_with_mb(1);
        // Mate three plies below a node first reached at ply 2.
        tt.store(exact(8, 3, mate_score_to_tt(MATE_SCORE - 5, 2)));
        assert_eq!(tt.probe(8).expect("exists").score, MATE_SCORE - 3);
        assert_eq!(tt.probe_score(8, 3, -100, 100, 2), Some(MATE_SCORE - 5));
        // The same node reached through a longer line is further from mate.
        assert_eq!(tt.probe_score(8, 3, -100, 100, 6), Some(MATE_SCORE - 9));

        tt.store(exact(9, 3, mate_score_to_tt(-MATE_SCORE + 4, 1)));
        assert_eq!(tt.probe_score(9, 3, -100, 100, 5), Some(-MATE_SCORE + 8));
    }

    #[test]
    fn bound_from_window() {
        assert_eq!(Bound::from_window(-10, -10, 10), Bound::Upper);
        assert_eq!(Bound::from_window(10, -10, 10), Bound::Lower);
        assert_eq!(Bound::from_window(0, -10, 10), Bound::Exact);
    }

    #[test]
    fn depth_preferred_replacement() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let key = 555;
        tt.store(exact(key, 2, 1));
        tt.store(exact(key, 1, 9));
        assert_eq!(tt.probe(key).expect("exists").score, 1);
        tt.store(exact(key, 6, 3));
        let got = tt.probe(key).expect("exists");
        assert_eq!(got.depth, 6);
        assert_eq!(got.score, 3);
    }
}
