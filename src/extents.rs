use log::debug;

use crate::Grid;

/// Precomputed horizontal reach of open space around each vertex row.
///
/// For vertex row `y` the tables describe the tile row `y - 1` directly below
/// it. `left_down[y][x]` is the closest vertex at or left of `x - 1` where the
/// blocked status of that tile row changes; `right_down[y][x]` is the closest
/// one at or right of `x + 1`. Rows `0..=size_y + 1` are stored so the row
/// above the topmost vertex row is available too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extents {
    size_x: i32,
    size_y: i32,
    fingerprint: u64,
    left_down: Vec<i32>,
    right_down: Vec<i32>,
}

impl Extents {
    /// Builds the tables with one sweep in each direction per row
    pub fn build(grid: &impl Grid) -> Self {
        let (size_x, size_y) = (grid.size_x(), grid.size_y());
        let width = (size_x + 1) as usize;
        let len = width * (size_y + 2) as usize;

        let mut left_down = vec![0; len];
        let mut right_down = vec![0; len];

        for y in 0..size_y + 2 {
            let row = y as usize * width;

            let mut last_blocked = true;
            let mut last_x = -1;
            for x in 0..=size_x {
                left_down[row + x as usize] = last_x;
                if grid.is_blocked(x, y - 1) != last_blocked {
                    last_x = x;
                    last_blocked = !last_blocked;
                }
            }

            let mut last_blocked = true;
            let mut last_x = size_x + 1;
            for x in (0..=size_x).rev() {
                right_down[row + x as usize] = last_x;
                if grid.is_blocked(x - 1, y - 1) != last_blocked {
                    last_x = x;
                    last_blocked = !last_blocked;
                }
            }
        }

        Self {
            size_x,
            size_y,
            fingerprint: grid.fingerprint(),
            left_down,
            right_down,
        }
    }

    /// Returns true if the tables were built for a grid of the same size and
    /// tiles
    pub fn fits(&self, grid: &impl Grid) -> bool {
        self.size_x == grid.size_x()
            && self.size_y == grid.size_y()
            && self.fingerprint == grid.fingerprint()
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            (0..=self.size_x).contains(&x) && (0..self.size_y + 2).contains(&y),
            "Extent lookup ({x}, {y}) out of range"
        );
        (y * (self.size_x + 1) + x) as usize
    }

    pub fn left_up(&self, x: i32, y: i32) -> i32 {
        self.left_down[self.index(x, y + 1)]
    }

    pub fn left_down(&self, x: i32, y: i32) -> i32 {
        self.left_down[self.index(x, y)]
    }

    /// Closest change to the left in either adjacent tile row
    pub fn left_any(&self, x: i32, y: i32) -> i32 {
        self.left_down(x, y).max(self.left_up(x, y))
    }

    pub fn right_up(&self, x: i32, y: i32) -> i32 {
        self.right_down[self.index(x, y + 1)]
    }

    pub fn right_down(&self, x: i32, y: i32) -> i32 {
        self.right_down[self.index(x, y)]
    }

    /// Closest change to the right in either adjacent tile row
    pub fn right_any(&self, x: i32, y: i32) -> i32 {
        self.right_down(x, y).min(self.right_up(x, y))
    }
}

/// Keeps the extent tables alive between searches.
///
/// The tables are rebuilt whenever the presented grid differs in size or
/// tiles from the one they were built for, as told by [`Grid::fingerprint`].
#[derive(Debug, Default, Clone)]
pub struct ExtentCache {
    extents: Option<Extents>,
}

impl ExtentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tables for `grid`, building them if necessary
    pub fn get(&mut self, grid: &impl Grid) -> &Extents {
        if matches!(&self.extents, Some(extents) if !extents.fits(grid)) {
            self.extents = None;
        }

        self.extents.get_or_insert_with(|| {
            debug!(
                "Building extent tables for {}x{} grid",
                grid.size_x(),
                grid.size_y()
            );
            Extents::build(grid)
        })
    }

    /// Forces the next [`ExtentCache::get`] to rebuild
    pub fn invalidate(&mut self) {
        self.extents = None;
    }

    /// Get the extent cache's extents.
    pub fn extents(&self) -> Option<&Extents> {
        self.extents.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use crate::GridGraph;

    use super::*;

    #[test]
    fn open_grid_reaches_boundary() {
        let (w, h) = (7, 4);
        let grid = GridGraph::new(w, h);
        let extents = Extents::build(&grid);

        // Nothing lies left of x = 0 or right of x = w
        for x in 1..=w {
            for y in 0..h {
                assert_eq!(extents.left_up(x, y), 0);
            }
            for y in 1..=h {
                assert_eq!(extents.left_down(x, y), 0);
            }
            for y in 1..h {
                assert_eq!(extents.left_any(x, y), 0);
            }
        }
        for x in 0..w {
            for y in 0..h {
                assert_eq!(extents.right_up(x, y), w);
            }
            for y in 1..=h {
                assert_eq!(extents.right_down(x, y), w);
            }
            for y in 1..h {
                assert_eq!(extents.right_any(x, y), w);
            }
        }
        assert_eq!(extents.left_up(0, 0), -1);
        assert_eq!(extents.right_up(w, 0), w + 1);
    }

    #[test]
    fn obstacle_splits_runs() {
        let grid = GridGraph::from_ascii(
            "
            ......
            ..##..
            ......
        ",
        )
        .unwrap();
        let extents = Extents::build(&grid);

        // Tile row 1 reads open [0, 2), blocked [2, 4), open [4, 6)
        assert_eq!(extents.left_up(1, 1), 0);
        assert_eq!(extents.right_up(1, 1), 2);
        assert_eq!(extents.left_up(5, 1), 4);
        assert_eq!(extents.right_up(5, 1), 6);
        assert_eq!(extents.left_down(5, 2), 4);
        assert_eq!(extents.right_down(0, 2), 2);

        // At the obstacle corners the next change is its far side
        assert_eq!(extents.right_any(2, 1), 4);
        assert_eq!(extents.left_any(4, 1), 2);
        assert_eq!(extents.right_down(2, 1), 6);
    }

    #[test]
    fn cache_follows_grid() {
        let mut cache = ExtentCache::new();
        assert!(cache.extents().is_none());

        let small = GridGraph::new(3, 3);
        let built = cache.get(&small).clone();
        assert!(built.fits(&small));

        // Same size, different tiles
        let mut blocked = GridGraph::new(3, 3);
        blocked.set_blocked(1, 1, true);
        assert!(!built.fits(&blocked));
        let rebuilt = cache.get(&blocked).clone();
        assert_ne!(rebuilt, built);
        assert_eq!(rebuilt, Extents::build(&blocked));

        // Same tiles edited in place
        blocked.set_blocked(1, 1, false);
        assert_eq!(cache.get(&blocked), &built);

        // Another grid with equal tiles shares the tables
        assert_eq!(cache.get(&GridGraph::new(3, 3)), &built);

        cache.invalidate();
        assert!(cache.extents().is_none());

        let large = GridGraph::new(5, 2);
        assert!(cache.get(&large).fits(&large));
    }
}
