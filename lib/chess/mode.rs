use crate::chess::{Board, Color, Coord, Move, Role};
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

mod losers;
mod standard;

pub use losers::*;
pub use standard::*;

/// The rules of a chess variant.
///
/// The [`Board`] owns the movement of pieces; a [`GameMode`] decides which
/// positions are acceptable and when a game is over. [`Self::board_valid`] is
/// asked while the candidate move is applied to the board and must leave the
/// board applied when it returns, whatever it did in between.
#[cfg_attr(test, automock)]
pub trait GameMode: Debug + Send + Sync {
    /// Populates an empty [`Board`] with this variant's starting position.
    fn init_pieces(&self, board: &mut Board);

    /// Whether the resulting position is acceptable for the player who moved.
    fn board_valid(&self, board: &mut Board, mover: Color, last_move: &mut Move) -> bool;

    /// Whether the given player has lost, assuming they have no moves left.
    fn has_player_lost(&self, board: &Board, victim: Color) -> bool;

    /// Invoked once a move has been committed to the board.
    fn post_move_action(&self, _board: &Board, _last_move: &Move) {}
}

const BACK_RANK: [(i8, Role); 8] = [
    (0, Role::Rook),
    (7, Role::Rook),
    (1, Role::Knight),
    (6, Role::Knight),
    (2, Role::Bishop),
    (5, Role::Bishop),
    (4, Role::Queen),
    (3, Role::King),
];

/// Deals each side the classic army on its two home ranks.
pub(crate) fn classic_army(board: &mut Board) {
    let height = 8;

    for color in [Color::White, Color::Black] {
        let home = if color == Color::White { 0 } else { height - 1 };

        for file in 0..8 {
            board.spawn(Role::Pawn, color, Coord::new(file, home + color.direction()));
        }

        for (file, role) in BACK_RANK {
            board.spawn(role, color, Coord::new(file, home));
        }
    }
}
