use crate::game_state::{game_state::GameState, piece::Piece};
use crate::move_generation::legal_move_shared::push_step_moves;
use crate::moves::knight_moves::knight_targets;
use crate::moves::move_descriptions::ChessMove;

pub fn generate_knight_moves(game_state: &GameState, knight: &Piece, out: &mut Vec<ChessMove>) {
    push_step_moves(game_state, knight, knight_targets(knight.square), out);
}
