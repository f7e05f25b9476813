//! GameState-to-FEN placement generator.

use crate::game_state::{chess_types::Square, game_state::GameState};

/// Piece-placement field of FEN, rank 8 first.
pub fn generate_placement(game_state: &GameState) -> String {
    let mut out = String::with_capacity(72);

    for row in 0..8u8 {
        let mut empty_run = 0u8;
        for col in 0..8u8 {
            match game_state.piece_at(Square::new(row, col)) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece.code());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if row < 7 {
            out.push('/');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::zobrist::ZobristTable;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn placement_round_trips() {
        let table = Arc::new(ZobristTable::default());
        for placement in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
        ] {
            let (game, _) = parse_fen(placement, table.clone()).expect("placement");
            assert_eq!(generate_placement(&game), placement);
        }
    }
}
