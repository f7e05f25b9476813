use crate::game_state::{game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_shared::push_ray_moves;
use crate::moves::move_descriptions::ChessMove;
use crate::moves::sliding_moves::BISHOP_DIRECTIONS;

pub fn generate_bishop_moves(game_state: &GameState, bishop: &Piece, out: &mut Vec<ChessMove>) {
    push_ray_moves(game_state, bishop, &BISHOP_DIRECTIONS, out);
}
