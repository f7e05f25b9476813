use crate::game_state::{game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_shared::push_ray_moves;
use crate::moves::move_descriptions::ChessMove;
use crate::moves::sliding_moves::QUEEN_DIRECTIONS;

pub fn generate_queen_moves(game_state: &GameState, queen: &Piece, out: &mut Vec<ChessMove>) {
    push_ray_moves(game_state, queen, &QUEEN_DIRECTIONS, out);
}
