use crate::chess::{Board, Coord, PieceId};
use derive_more::{Debug, Display};
use std::hash::{Hash, Hasher};

/// A move of a piece between two tiles.
///
/// A [`Move`] doubles as the undo record for itself. Executing it snapshots
/// everything the board is about to forget, so undoing it restores the board
/// bit for bit, including the capture roster and `has_moved` flags.
#[derive(Debug, Display, Clone)]
#[debug("Move({whence}{whither})")]
#[display("{whence}{whither}")]
pub struct Move {
    piece: PieceId,
    whence: Coord,
    whither: Coord,
    captured: Option<PieceId>,
    piece_had_moved: bool,
    captured_had_moved: bool,
    applied: bool,
}

impl Move {
    /// Constructs a [`Move`] of the given piece to the given tile.
    pub fn new(piece: PieceId, whence: Coord, whither: Coord) -> Self {
        Move {
            piece,
            whence,
            whither,
            captured: None,
            piece_had_moved: false,
            captured_had_moved: false,
            applied: false,
        }
    }

    /// The piece moved.
    #[inline(always)]
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// The tile the piece moved from.
    #[inline(always)]
    pub fn whence(&self) -> Coord {
        self.whence
    }

    /// The tile the piece moved to.
    #[inline(always)]
    pub fn whither(&self) -> Coord {
        self.whither
    }

    /// The piece captured by this move, once it has been executed.
    #[inline(always)]
    pub fn captured(&self) -> Option<PieceId> {
        self.captured.filter(|_| self.applied)
    }

    /// Whether this move is currently applied to the board.
    #[inline(always)]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Applies this move to the board.
    ///
    /// Does nothing if the move is already applied. The victim at the
    /// destination, if any, is parked off board and its roster updated. The
    /// mover's `has_moved` flag is only raised when `apply_side_effects` is
    /// set, so that speculative executions leave no trace once undone.
    pub fn execute(&mut self, board: &mut Board, apply_side_effects: bool) {
        if self.applied {
            return;
        }

        self.piece_had_moved = board.piece(self.piece).has_moved();
        self.captured = board.piece_at(self.whither);

        if let Some(victim) = self.captured {
            self.captured_had_moved = board.piece(victim).has_moved();
            board.capture(victim);
        }

        board.relocate(self.piece, self.whither);

        if apply_side_effects {
            board.set_has_moved(self.piece, true);
        }

        self.applied = true;
    }

    /// Reverts this move, restoring the board to its state before execution.
    ///
    /// Does nothing if the move is not currently applied.
    pub fn undo(&mut self, board: &mut Board) {
        if !self.applied {
            return;
        }

        board.relocate(self.piece, self.whence);
        board.set_has_moved(self.piece, self.piece_had_moved);

        if let Some(victim) = self.captured {
            board.uncapture(victim, self.whither);
            board.set_has_moved(victim, self.captured_had_moved);
        }

        self.applied = false;
    }
}

/// Moves compare by piece and destination only.
///
/// Execution bookkeeping is ignored, so a move listed by
/// [`Board::valid_moves`] matches the same move after it has been executed.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.piece == other.piece && self.whither == other.whither
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.piece.hash(state);
        self.whither.hash(state);
    }
}
