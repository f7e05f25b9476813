//! Errors used throughout the engine.
//!
//! `ChessErrors` is the single error type returned by parsing, move lookup,
//! opening-book loading and engine configuration. Board and move operations
//! themselves are infallible: they are only ever called with coordinates and
//! moves produced by the generator for the current position.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Square};

#[derive(Debug, Error)]
pub enum ChessErrors {
    /// A textual board encoding contained a letter that is not one of
    /// `P N B R Q K` in either case.
    #[error("unknown piece code '{0}'")]
    UnknownPieceCode(char),

    #[error("invalid board layout: {0}")]
    InvalidBoardLayout(String),

    #[error("invalid FEN field '{field}': {reason}")]
    InvalidFenField { field: String, reason: String },

    #[error("invalid algebraic square '{0}'")]
    InvalidAlgebraicSquare(String),

    #[error("no legal move for {color:?} from {from:?} to {to:?}")]
    IllegalMove {
        color: Color,
        from: Square,
        to: Square,
    },

    #[error("no legal move for {color:?} matches notation '{notation}'")]
    UnknownNotation { color: Color, notation: String },

    #[error("{0:?} has no legal moves")]
    NoLegalMoves(Color),

    #[error("failed reading opening data from {path}")]
    OpeningData {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("all {0} search workers failed before reporting a result")]
    SearchWorkersFailed(usize),
}

pub type ChessResult<T> = Result<T, ChessErrors>;
