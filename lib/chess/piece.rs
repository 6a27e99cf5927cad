use crate::chess::{Board, Color, Coord, Move, Role};
use derive_more::Display;

/// A handle to a [`Piece`] in a [`Board`]'s arena.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("#{_0}")]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    #[inline(always)]
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A chess piece.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub role: Role,
    pub color: Color,
    pub(crate) location: Coord,
    pub(crate) has_moved: bool,
}

impl Piece {
    /// The tile this piece stands on, or [`Coord::OFF_BOARD`] while captured.
    #[inline(always)]
    pub fn location(&self) -> Coord {
        self.location
    }

    /// Whether this piece has moved since the game started.
    #[inline(always)]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

impl Board {
    /// The candidate moves for this piece, from geometry and occupancy alone.
    ///
    /// Candidates ignore king safety and every other [`GameMode`] rule;
    /// see [`Self::valid_moves`] for the legal subset.
    ///
    /// [`GameMode`]: crate::chess::GameMode
    pub fn possible_moves(&self, id: PieceId) -> Vec<Move> {
        match self.piece(id).role {
            Role::Pawn => self.pawn_moves(id),
            Role::Knight => {
                let whence = self.piece(id).location();
                self.jump_moves(id, self.geometry().knight_jumps(whence))
            }
            Role::Rook => self.ray_moves(id, |c| self.geometry().adjacent_rank_file(c), true, true),
            Role::Bishop => self.ray_moves(id, |c| self.geometry().adjacent_diagonal(c), true, true),
            Role::Queen => {
                let mut moves =
                    self.ray_moves(id, |c| self.geometry().adjacent_rank_file(c), true, true);
                moves.extend(self.ray_moves(id, |c| self.geometry().adjacent_diagonal(c), true, true));
                moves
            }
            Role::King => {
                let mut moves =
                    self.ray_moves(id, |c| self.geometry().adjacent_rank_file(c), false, true);
                moves.extend(self.ray_moves(id, |c| self.geometry().adjacent_diagonal(c), false, true));
                moves
            }
            Role::Chancellor => {
                let whence = self.piece(id).location();
                let mut moves =
                    self.ray_moves(id, |c| self.geometry().adjacent_rank_file(c), true, true);
                moves.extend(self.jump_moves(id, self.geometry().knight_jumps(whence)));
                moves
            }
            Role::LameQueen => {
                let mut moves =
                    self.ray_moves(id, |c| self.geometry().adjacent_diagonal(c), true, true);
                moves.extend(self.ray_moves(id, |c| self.geometry().adjacent_rank_file(c), true, false));
                moves
            }
        }
    }

    /// The subset of [`Self::possible_moves`] that lands on an enemy piece.
    ///
    /// Evaluated on raw candidates, never on the legal subset, so that threat
    /// detection cannot recurse into legality checking.
    pub fn capture_moves(&self, id: PieceId) -> Vec<Move> {
        let color = self.piece(id).color;
        self.possible_moves(id)
            .into_iter()
            .filter(|m| self.has_enemy_piece(m.whither(), color))
            .collect()
    }

    /// The subset of [`Self::possible_moves`] that passes [`Self::is_legal`].
    pub fn valid_moves(&mut self, id: PieceId) -> Vec<Move> {
        let mut moves = Vec::new();
        for mut m in self.possible_moves(id) {
            if self.is_legal(&mut m) {
                moves.push(m);
            }
        }
        moves
    }

    /// Walks every direction returned by `adjacent`, collecting movable tiles.
    ///
    /// Stops inclusively on an enemy piece and exclusively on a friendly piece
    /// or the board edge; `cont = false` restricts each ray to a single step.
    fn ray_moves(
        &self,
        id: PieceId,
        adjacent: impl Fn(Coord) -> Vec<Coord>,
        cont: bool,
        can_capture: bool,
    ) -> Vec<Move> {
        let piece = *self.piece(id);
        let whence = piece.location();
        let mut moves = Vec::new();
        for (i, mut tile) in adjacent(whence).into_iter().enumerate() {
            while self.is_movable_tile(tile, piece.color, can_capture) {
                moves.push(Move::new(id, whence, tile));
                if self.has_enemy_piece(tile, piece.color) || !cont {
                    break;
                }
                tile = adjacent(tile)[i];
            }
        }
        moves
    }

    fn jump_moves(&self, id: PieceId, tiles: Vec<Coord>) -> Vec<Move> {
        let piece = *self.piece(id);
        tiles
            .into_iter()
            .filter(|&t| self.is_movable_tile(t, piece.color, true))
            .map(|t| Move::new(id, piece.location(), t))
            .collect()
    }

    fn pawn_moves(&self, id: PieceId) -> Vec<Move> {
        let piece = *self.piece(id);
        let whence = piece.location();
        let direction = piece.color.direction();
        let mut moves = Vec::new();

        for tile in self
            .geometry()
            .pawn_advances(whence, direction, piece.has_moved())
        {
            if self.is_movable_tile(tile, piece.color, false) {
                moves.push(Move::new(id, whence, tile));
            } else {
                break;
            }
        }

        for tile in self.geometry().pawn_attacks(whence, direction) {
            if self.has_enemy_piece(tile, piece.color) {
                moves.push(Move::new(id, whence, tile));
            }
        }

        moves
    }
}
