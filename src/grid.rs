use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use glam::IVec2;
use rand::Rng;

use crate::Error;

const SQRT_TWO: f32 = std::f32::consts::SQRT_2;

/// A grid of blocked and unblocked unit tiles.
///
/// Tile `(x, y)` is the cell whose corners are the vertices `(x, y)` and
/// `(x + 1, y + 1)`. Paths run between vertices, which range over
/// `0..=size_x` and `0..=size_y`. Tiles outside the grid count as blocked.
pub trait Grid {
    fn size_x(&self) -> i32;

    fn size_y(&self) -> i32;

    fn is_blocked(&self, x: i32, y: i32) -> bool;

    /// Vertex `(x, y)` is the bottom left corner of a blocked tile
    #[inline]
    fn bottom_left_of_blocked_tile(&self, x: i32, y: i32) -> bool {
        self.is_blocked(x, y)
    }

    #[inline]
    fn bottom_right_of_blocked_tile(&self, x: i32, y: i32) -> bool {
        self.is_blocked(x - 1, y)
    }

    #[inline]
    fn top_left_of_blocked_tile(&self, x: i32, y: i32) -> bool {
        self.is_blocked(x, y - 1)
    }

    #[inline]
    fn top_right_of_blocked_tile(&self, x: i32, y: i32) -> bool {
        self.is_blocked(x - 1, y - 1)
    }

    /// Hash of the grid's size and the blocked status of every tile.
    ///
    /// Grids with equal fingerprints are taken to have the same tiles.
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        (self.size_x(), self.size_y()).hash(&mut hasher);
        for y in 0..self.size_y() {
            for x in 0..self.size_x() {
                self.is_blocked(x, y).hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    fn is_valid_coordinate(&self, x: i32, y: i32) -> bool {
        (0..=self.size_x()).contains(&x) && (0..=self.size_y()).contains(&y)
    }

    /// Returns true if at least one of the four tiles touching the vertex is
    /// open
    fn is_unblocked_coordinate(&self, x: i32, y: i32) -> bool {
        !self.top_right_of_blocked_tile(x, y)
            || !self.top_left_of_blocked_tile(x, y)
            || !self.bottom_right_of_blocked_tile(x, y)
            || !self.bottom_left_of_blocked_tile(x, y)
    }

    /// Euclidean distance between two vertices
    fn distance(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();

        if dx == 0 {
            dy as f32
        } else if dy == 0 {
            dx as f32
        } else if dx == dy {
            SQRT_TWO * dx as f32
        } else {
            ((dx * dx + dy * dy) as f32).sqrt()
        }
    }

    /// Returns true if the straight segment between the two vertices does
    /// not pass through the interior of any blocked tile.
    ///
    /// A segment may run along the edge of a blocked tile, but not between
    /// two blocked tiles sharing that edge.
    fn line_of_sight(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        let (mut x, mut y) = (x1, y1);
        let (mut dx, mut dy) = (x2 - x1, y2 - y1);

        let (sign_x, offset_x) = if dx < 0 { (-1, -1) } else { (1, 0) };
        let (sign_y, offset_y) = if dy < 0 { (-1, -1) } else { (1, 0) };
        dx = dx.abs();
        dy = dy.abs();

        let mut f = 0;

        if dx >= dy {
            while x != x2 {
                f += dy;
                if f >= dx {
                    if self.is_blocked(x + offset_x, y + offset_y) {
                        return false;
                    }
                    y += sign_y;
                    f -= dx;
                }
                if f != 0 && self.is_blocked(x + offset_x, y + offset_y) {
                    return false;
                }
                if dy == 0 && self.is_blocked(x + offset_x, y) && self.is_blocked(x + offset_x, y - 1)
                {
                    return false;
                }
                x += sign_x;
            }
        } else {
            while y != y2 {
                f += dx;
                if f >= dy {
                    if self.is_blocked(x + offset_x, y + offset_y) {
                        return false;
                    }
                    x += sign_x;
                    f -= dy;
                }
                if f != 0 && self.is_blocked(x + offset_x, y + offset_y) {
                    return false;
                }
                if dx == 0 && self.is_blocked(x, y + offset_y) && self.is_blocked(x - 1, y + offset_y)
                {
                    return false;
                }
                y += sign_y;
            }
        }

        true
    }
}

/// Row-major grid of tiles owned in memory
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGraph {
    size_x: i32,
    size_y: i32,
    tiles: Vec<bool>,
}

impl GridGraph {
    /// Creates a fully open grid
    pub fn new(size_x: i32, size_y: i32) -> Self {
        assert!(size_x >= 0 && size_y >= 0, "Negative grid size");

        Self {
            size_x,
            size_y,
            tiles: vec![false; (size_x * size_y) as usize],
        }
    }

    /// Parses a grid from a picture of `#` (blocked) and `.` (open) tiles.
    ///
    /// The first line is the topmost row, `y = size_y - 1`. Blank lines and
    /// surrounding whitespace are ignored.
    pub fn from_ascii(map: &str) -> Result<Self, Error> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let size_y = rows.len() as i32;
        let size_x = rows.first().map_or(0, |row| row.chars().count()) as i32;
        let mut grid = Self::new(size_x, size_y);

        for (i, row) in rows.iter().enumerate() {
            let y = size_y - 1 - i as i32;
            let found = row.chars().count() as i32;
            if found != size_x {
                return Err(Error::RaggedMap {
                    row: i,
                    expected: size_x,
                    found,
                });
            }

            for (x, c) in row.chars().enumerate() {
                let blocked = match c {
                    '#' => true,
                    '.' => false,
                    c => return Err(Error::InvalidTile(c)),
                };
                grid.set_blocked(x as i32, y, blocked);
            }
        }

        Ok(grid)
    }

    /// Creates a grid where each tile is independently blocked with
    /// probability `blocked_ratio`
    pub fn random(size_x: i32, size_y: i32, blocked_ratio: f64, rng: &mut impl Rng) -> Self {
        let mut grid = Self::new(size_x, size_y);
        grid.tiles
            .iter_mut()
            .for_each(|tile| *tile = rng.gen_bool(blocked_ratio));
        grid
    }

    /// # Panics
    /// If the tile is outside the grid.
    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        assert!(self.is_valid_block(x, y), "Tile ({x}, {y}) outside grid");
        let index = self.index(x, y);
        self.tiles[index] = blocked;
    }

    /// Sets the tile if it lies inside the grid, otherwise does nothing
    pub fn try_set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        if self.is_valid_block(x, y) {
            self.set_blocked(x, y, blocked)
        }
    }

    pub fn is_valid_block(&self, x: i32, y: i32) -> bool {
        (0..self.size_x).contains(&x) && (0..self.size_y).contains(&y)
    }

    /// Returns an iterator over the blocked tiles
    pub fn blocked_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size_y)
            .flat_map(move |y| (0..self.size_x).map(move |x| IVec2::new(x, y)))
            .filter(move |p| self.is_blocked(p.x, p.y))
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size_x + x) as usize
    }
}

impl Grid for GridGraph {
    fn size_x(&self) -> i32 {
        self.size_x
    }

    fn size_y(&self) -> i32 {
        self.size_y
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !self.is_valid_block(x, y) {
            return true;
        }
        self.tiles[self.index(x, y)]
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        (self.size_x, self.size_y, &self.tiles).hash(&mut hasher);
        hasher.finish()
    }
}
