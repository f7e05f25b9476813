//! Engine-vs-engine self play from the initial position.
//!
//! Run with:
//! `cargo run --release --bin self_play -- --depth 4 --threads 4`
//! `RUST_LOG=debug cargo run --release --bin self_play -- --no-book --seed 7`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use plum_minmax::engines::engine_alpha_beta::AlphaBetaEngine;
use plum_minmax::errors::ChessResult;
use plum_minmax::game_state::{chess_types::Color, game_state::GameState};
use plum_minmax::move_generation::legal_move_checks::{game_status, GameStatus};
use plum_minmax::search::alpha_beta::SearchConfig;
use plum_minmax::search::heuristic_scoring::HeuristicScorer;
use plum_minmax::search::zobrist::ZobristTable;
use plum_minmax::tables::opening_book::OpeningBook;
use plum_minmax::utils::fen_generator::generate_placement;
use plum_minmax::utils::render_game_state::render_game_state;

#[derive(Debug, Parser)]
#[command(about = "Play the engine against itself")]
struct Args {
    /// Nominal search depth in plies.
    #[arg(long, default_value_t = 4)]
    depth: u8,

    /// Parallel root workers per engine.
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Stop after this many plies even if the game is not over.
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Seed for move shuffling and book choice; each side derives its own.
    #[arg(long)]
    seed: Option<u64>,

    /// Opening lines file replacing the embedded book.
    #[arg(long, conflicts_with = "no_book")]
    book: Option<PathBuf>,

    /// Search from the first move.
    #[arg(long)]
    no_book: bool,
}

fn engine_for(args: &Args, side: Color) -> AlphaBetaEngine<HeuristicScorer> {
    let config = SearchConfig {
        depth: args.depth.max(1),
        threads: args.threads.max(1),
        use_book: !args.no_book,
        seed: args.seed.map(|seed| seed.wrapping_add(side.index() as u64)),
        ..SearchConfig::default()
    };
    let engine = AlphaBetaEngine::standard(config);
    match &args.book {
        Some(path) if !args.no_book => engine.with_book(OpeningBook::load_or_empty(path)),
        _ => engine,
    }
}

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut light = engine_for(&args, Color::Light);
    let mut dark = engine_for(&args, Color::Dark);
    let mut game = GameState::new_game(Arc::new(ZobristTable::default()));
    let mut side = Color::Light;

    let status = loop {
        let status = game_status(&mut game, side);
        if status != GameStatus::Ongoing {
            break status;
        }
        if game.notation().len() >= args.max_plies {
            warn!(plies = args.max_plies, "ply cap reached");
            break status;
        }

        let engine = match side {
            Color::Light => &mut light,
            Color::Dark => &mut dark,
        };
        let out = engine.play_move(&mut game, side)?;
        if let Some(played) = game.notation().last() {
            info!(
                ply = game.notation().len(),
                side = ?side,
                played = %played,
                score = out.score,
                book = out.from_book,
                "move"
            );
        }
        side = side.opposite();
    };

    println!("{}", game.notation().join(" "));
    println!("{}", render_game_state(&game));
    println!("placement: {}", generate_placement(&game));
    println!("result: {status:?} after {} plies", game.notation().len());
    Ok(())
}
