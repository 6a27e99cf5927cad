use crate::chess::{classic_army, Board, Color, GameMode, Move};
use tracing::info;

/// Orthodox chess.
///
/// A move may not leave the mover's own king threatened; a player with no
/// legal moves is checkmated if their king is threatened and stalemated
/// otherwise.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StandardGame;

impl GameMode for StandardGame {
    fn init_pieces(&self, board: &mut Board) {
        classic_army(board);
    }

    fn board_valid(&self, board: &mut Board, mover: Color, _last_move: &mut Move) -> bool {
        match board.player(mover).king() {
            None => true,
            Some(k) => !board.is_threatened(board.piece(k).location(), mover),
        }
    }

    fn has_player_lost(&self, board: &Board, victim: Color) -> bool {
        board
            .player(victim)
            .king()
            .is_some_and(|k| board.is_threatened(board.piece(k).location(), victim))
    }

    fn post_move_action(&self, board: &Board, last_move: &Move) {
        let defender = !board.piece(last_move.piece()).color;
        if self.has_player_lost(board, defender) {
            info!(%defender, "check");
        }
    }
}
