use crate::chess::{Color, PieceId, Role};

/// One side's roster of pieces.
///
/// The [`Board`][`crate::chess::Board`] keeps one [`Player`] per [`Color`] and
/// moves [`PieceId`]s between the active and captured rosters as captures are
/// executed and undone. Rosters are kept in ascending id order, so undoing a
/// capture restores the roster to its exact prior state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Player {
    color: Color,
    active: Vec<PieceId>,
    captured: Vec<PieceId>,
    king: Option<PieceId>,
    wins: u32,
}

impl Player {
    /// Constructs a [`Player`] with an empty roster.
    pub fn new(color: Color) -> Self {
        Player {
            color,
            active: Vec::new(),
            captured: Vec::new(),
            king: None,
            wins: 0,
        }
    }

    /// This side's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The rank direction this side's pawns advance toward.
    #[inline(always)]
    pub fn direction(&self) -> i8 {
        self.color.direction()
    }

    /// This side's pieces still on the board.
    #[inline(always)]
    pub fn pieces(&self) -> &[PieceId] {
        &self.active
    }

    /// This side's pieces that have been captured.
    #[inline(always)]
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    /// This side's king, if it has one.
    #[inline(always)]
    pub fn king(&self) -> Option<PieceId> {
        self.king
    }

    /// How many games this side has won.
    #[inline(always)]
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Credits this side with a win.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Enrolls a newly spawned piece.
    pub(crate) fn add_piece(&mut self, id: PieceId, role: Role) {
        let at = match self.active.binary_search(&id) {
            Ok(i) | Err(i) => i,
        };

        self.active.insert(at, id);

        if role == Role::King {
            self.king = Some(id);
        }
    }

    /// Moves a piece from the active roster to the captured roster.
    pub(crate) fn piece_captured(&mut self, id: PieceId) {
        self.active.retain(|&p| p != id);
        self.captured.push(id);
    }

    /// Returns a captured piece to the active roster.
    pub(crate) fn piece_uncaptured(&mut self, id: PieceId) {
        self.captured.retain(|&p| p != id);

        let at = match self.active.binary_search(&id) {
            Ok(i) | Err(i) => i,
        };

        self.active.insert(at, id);
    }
}
