use crate::chess::Coord;
use std::fmt::Debug;

/// The shape of a chess board.
///
/// Implementations provide pure coordinate math only; occupancy and rules live
/// on the [`Board`][`crate::chess::Board`]. Adjacency methods may return
/// off-board coordinates, which callers bounds-check, and must keep each
/// direction at a stable index across calls so that rays can be walked by
/// repeated lookups at the same index.
pub trait Geometry: Debug + Send + Sync {
    /// Whether the coordinate names a tile on this board.
    fn in_bounds(&self, c: Coord) -> bool;

    /// One step along every rank-file direction, e.g. 4 tiles on a
    /// rectangular board and 6 on a hexagonal one.
    fn adjacent_rank_file(&self, c: Coord) -> Vec<Coord>;

    /// One step along every diagonal direction, e.g. 4 tiles on a rectangular
    /// board and 5 on a hexagonal one.
    fn adjacent_diagonal(&self, c: Coord) -> Vec<Coord>;

    /// Every tile a knight's jump away, e.g. 8 tiles on a rectangular board
    /// and 12 on a hexagonal one.
    fn knight_jumps(&self, c: Coord) -> Vec<Coord>;

    /// The tiles a pawn may advance to, ordered nearest first; two entries
    /// for a pawn that has not yet moved, one otherwise.
    fn pawn_advances(&self, c: Coord, direction: i8, has_moved: bool) -> Vec<Coord>;

    /// The tiles a pawn may capture on.
    fn pawn_attacks(&self, c: Coord, direction: i8) -> Vec<Coord>;

    /// The center of the tile in render space.
    fn render_position(&self, c: Coord) -> (f32, f32);

    /// The tile containing the given render-space point.
    fn board_position(&self, p: (f32, f32)) -> Coord;
}

/// The size of a tile in render space.
const TILE_SIZE: f32 = 2.0;

const RANK_FILE: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// A rectangular board, 8×8 unless stated otherwise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Rectangular {
    #[cfg_attr(test, strategy(1i8..=16))]
    pub width: i8,
    #[cfg_attr(test, strategy(1i8..=16))]
    pub height: i8,
}

impl Rectangular {
    /// Constructs a board of the given dimensions.
    pub fn new(width: i8, height: i8) -> Self {
        Rectangular { width, height }
    }
}

impl Default for Rectangular {
    fn default() -> Self {
        Rectangular::new(8, 8)
    }
}

impl Geometry for Rectangular {
    fn in_bounds(&self, c: Coord) -> bool {
        (0..self.width).contains(&c.file) && (0..self.height).contains(&c.rank)
    }

    fn adjacent_rank_file(&self, c: Coord) -> Vec<Coord> {
        RANK_FILE.iter().map(|&(df, dr)| c.offset(df, dr)).collect()
    }

    fn adjacent_diagonal(&self, c: Coord) -> Vec<Coord> {
        DIAGONAL.iter().map(|&(df, dr)| c.offset(df, dr)).collect()
    }

    fn knight_jumps(&self, c: Coord) -> Vec<Coord> {
        KNIGHT.iter().map(|&(df, dr)| c.offset(df, dr)).collect()
    }

    fn pawn_advances(&self, c: Coord, direction: i8, has_moved: bool) -> Vec<Coord> {
        if has_moved {
            vec![c.offset(0, direction)]
        } else {
            vec![c.offset(0, direction), c.offset(0, 2 * direction)]
        }
    }

    fn pawn_attacks(&self, c: Coord, direction: i8) -> Vec<Coord> {
        vec![c.offset(-1, direction), c.offset(1, direction)]
    }

    fn render_position(&self, c: Coord) -> (f32, f32) {
        (
            (c.file as f32 + 0.5 - self.width as f32 / 2.0) * TILE_SIZE,
            (c.rank as f32 + 0.5 - self.height as f32 / 2.0) * TILE_SIZE,
        )
    }

    fn board_position(&self, p: (f32, f32)) -> Coord {
        Coord::new(
            (p.0 / TILE_SIZE + self.width as f32 / 2.0 - 0.5).round() as i8,
            (p.1 / TILE_SIZE + self.height as f32 / 2.0 - 0.5).round() as i8,
        )
    }
}
