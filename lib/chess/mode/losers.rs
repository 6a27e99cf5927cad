use crate::chess::{classic_army, Board, Color, GameMode, Move};

/// Losing chess.
///
/// Captures are compulsory whenever one is available, the king confers no
/// special protection, and a player who runs out of pieces has lost.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LosersGame;

impl GameMode for LosersGame {
    fn init_pieces(&self, board: &mut Board) {
        classic_army(board);
    }

    fn board_valid(&self, board: &mut Board, mover: Color, last_move: &mut Move) -> bool {
        if last_move.captured().is_some() {
            return true;
        }

        last_move.undo(board);

        let forced = board
            .player(mover)
            .pieces()
            .to_vec()
            .into_iter()
            .any(|id| !board.capture_moves(id).is_empty());

        last_move.execute(board, false);

        !forced
    }

    fn has_player_lost(&self, board: &Board, victim: Color) -> bool {
        board.player(victim).pieces().is_empty()
    }
}
