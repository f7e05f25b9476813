//! Engine abstraction layer.
//!
//! Defines the output payload and the trait every move-choosing strategy
//! implements so callers (the self-play driver, benches, tests) can hold an
//! engine without knowing how it searches.

use crate::errors::ChessResult;
use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::moves::move_descriptions::ChessMove;

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<ChessMove>,
    /// Score of `best_move` from the mover's perspective; zero for book moves.
    pub score: i32,
    pub from_book: bool,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    /// Forget everything learned during the previous game.
    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> ChessResult<()> {
        Ok(())
    }

    /// Pick a move for `side` without modifying `game_state`.
    fn choose_move(&mut self, game_state: &GameState, side: Color) -> ChessResult<EngineOutput>;
}
