//! Opening book loaded from space-separated notation lines.
//!
//! Each non-empty line is one opening line, e.g. `e4 e5 Nf3 Nc6`. Lines are
//! indexed by the prefix of moves played so far; every line extending a
//! prefix contributes its next token, weighted by how many lines share it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::make_move;
use crate::moves::move_descriptions::ChessMove;
use crate::search::zobrist::ZobristTable;
use crate::utils::notation::{find_move_by_notation, CASTLE_TOKEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub token: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_prefix: HashMap<String, Vec<BookMove>>,
    lines: usize,
}

/// Comparable form of a notation token: check/mate suffixes dropped and
/// every castling alias folded to the single output token.
fn normalize(token: &str) -> &str {
    let token = token.trim_end_matches(['+', '#']);
    match token {
        "O-O" | "O-O-O" | "0-0-0" => CASTLE_TOKEN,
        other => other,
    }
}

fn prefix_key<'a, I: IntoIterator<Item = &'a str>>(tokens: I) -> String {
    tokens.into_iter().map(normalize).collect::<Vec<_>>().join(" ")
}

/// Longest prefix of `tokens` that replays legally from the initial layout.
fn legal_prefix_len(tokens: &[&str], zobrist: &Arc<ZobristTable>) -> usize {
    let mut game_state = GameState::new_game(Arc::clone(zobrist));
    let mut side = Color::Light;
    for (played, token) in tokens.iter().enumerate() {
        match find_move_by_notation(&mut game_state, side, token) {
            Ok(mut mv) => make_move(&mut game_state, &mut mv, MoveFlag::Committed),
            Err(_) => return played,
        }
        side = side.opposite();
    }
    tokens.len()
}

impl OpeningBook {
    /// The embedded opening set.
    pub fn load_default() -> Self {
        Self::from_lines_str(include_str!("data/openings.txt"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> ChessResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ChessErrors::OpeningData {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_lines_str(&data))
    }

    /// Like [`OpeningBook::load_from_path`], but a missing or unreadable file
    /// yields an empty book so the engine always falls through to search.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_path(path) {
            Ok(book) => book,
            Err(err) => {
                warn!(error = %err, "opening book unavailable, continuing without one");
                Self::default()
            }
        }
    }

    /// Index `text`. Lines containing an unplayable token are kept up to
    /// that token.
    pub fn from_lines_str(text: &str) -> Self {
        let zobrist = Arc::new(ZobristTable::default());
        let mut weights: HashMap<String, HashMap<String, u32>> = HashMap::new();
        let mut lines = 0;

        for (number, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() || tokens[0].starts_with('#') {
                continue;
            }
            let playable = legal_prefix_len(&tokens, &zobrist);
            if playable < tokens.len() {
                warn!(
                    line = number + 1,
                    token = tokens[playable],
                    "opening line truncated at unplayable move"
                );
            }
            if playable == 0 {
                continue;
            }
            lines += 1;

            for depth in 0..playable {
                let key = prefix_key(tokens[..depth].iter().copied());
                let next = tokens[depth].trim_end_matches(['+', '#']).to_owned();
                let entry = weights.entry(key).or_default().entry(next).or_insert(0);
                *entry = entry.saturating_add(1);
            }
        }

        let by_prefix = weights
            .into_iter()
            .map(|(prefix, moves)| {
                let mut row: Vec<BookMove> = moves
                    .into_iter()
                    .map(|(token, weight)| BookMove { token, weight })
                    .collect();
                // Deterministic order for seeded choices.
                row.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.token.cmp(&b.token)));
                (prefix, row)
            })
            .collect();

        debug!(lines, "opening book indexed");
        Self { by_prefix, lines }
    }

    /// Number of usable opening lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Candidate continuations after `played`.
    pub fn moves_for(&self, played: &[String]) -> Option<&[BookMove]> {
        self.by_prefix
            .get(&prefix_key(played.iter().map(String::as_str)))
            .map(Vec::as_slice)
    }

    pub fn choose_weighted_token<R: Rng + ?Sized>(
        &self,
        played: &[String],
        rng: &mut R,
    ) -> Option<&str> {
        let moves = self.moves_for(played)?;
        let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total_weight == 0 {
            return moves.first().map(|m| m.token.as_str());
        }

        let mut pick = rng.random_range(0..total_weight);
        for m in moves {
            let w = u64::from(m.weight);
            if pick < w {
                return Some(m.token.as_str());
            }
            pick -= w;
        }
        moves.first().map(|m| m.token.as_str())
    }

    /// Book move for `side` given the committed notation of `game_state`, if
    /// the played moves are still inside a known line and it is `side`'s turn.
    pub fn next_book_move<R: Rng + ?Sized>(
        &self,
        game_state: &mut GameState,
        side: Color,
        rng: &mut R,
    ) -> Option<ChessMove> {
        let played = game_state.notation().to_vec();
        let turn = if played.len() % 2 == 0 {
            Color::Light
        } else {
            Color::Dark
        };
        if turn != side {
            return None;
        }
        let token = self.choose_weighted_token(&played, rng)?;
        find_move_by_notation(game_state, side, token).ok()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::utils::notation::move_to_notation;

    const LINES: &str = "e4 e5 Nf3 Nc6\ne4 e5 Nf3 Nf6\ne4 c5\nd4 d5 c4\n";

    fn played(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn first_move_weights_count_lines() {
        let book = OpeningBook::from_lines_str(LINES);
        assert_eq!(book.len(), 4);
        let first = book.moves_for(&[]).expect("start is indexed");
        assert_eq!(
            first,
            &[
                BookMove { token: "e4".into(), weight: 3 },
                BookMove { token: "d4".into(), weight: 1 },
            ]
        );
    }

    #[test]
    fn continuations_follow_the_played_prefix() {
        let book = OpeningBook::from_lines_str(LINES);
        let after = book
            .moves_for(&played(&["e4", "e5", "Nf3"]))
            .expect("prefix is indexed");
        assert_eq!(after.len(), 2);
        assert!(book.moves_for(&played(&["e4", "e6"])).is_none());
        assert!(book.moves_for(&played(&["d4", "d5", "c4"])).is_none());
    }

    #[test]
    fn illegal_tokens_truncate_the_line() {
        let book = OpeningBook::from_lines_str("e4 e5 Ke3 Nc6\nQh5\n");
        assert_eq!(book.len(), 1);
        assert!(book.moves_for(&played(&["e4", "e5"])).is_none());
        assert!(book.moves_for(&played(&["e4"])).is_some());
    }

    #[test]
    fn next_book_move_is_legal_and_turn_aware() {
        let book = OpeningBook::from_lines_str(LINES);
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        let mut rng = StdRng::seed_from_u64(7);

        assert!(book.next_book_move(&mut game, Color::Dark, &mut rng).is_none());
        let mut mv = book
            .next_book_move(&mut game, Color::Light, &mut rng)
            .expect("book move at start");
        let token = move_to_notation(&mv);
        assert!(token == "e4" || token == "d4");

        make_move(&mut game, &mut mv, MoveFlag::Committed);
        let reply = book
            .next_book_move(&mut game, Color::Dark, &mut rng)
            .expect("book reply");
        assert_eq!(reply.piece.color, Color::Dark);
    }

    #[test]
    fn missing_file_degrades_to_empty_book() {
        let book = OpeningBook::load_or_empty("/nonexistent/openings.txt");
        assert!(book.is_empty());
        assert!(matches!(
            OpeningBook::load_from_path("/nonexistent/openings.txt"),
            Err(ChessErrors::OpeningData { .. })
        ));
        let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(book.next_book_move(&mut game, Color::Light, &mut rng).is_none());
    }

    #[test]
    fn embedded_book_replays_cleanly() {
        let book = OpeningBook::load_default();
        assert!(book.len() >= 20);
        let first = book.moves_for(&[]).expect("start is indexed");
        assert!(first.iter().any(|m| m.token == "e4"));
        assert!(first.iter().any(|m| m.token == "d4"));
    }
}
