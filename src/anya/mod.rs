//! Optimal any-angle search over grid vertices.
//!
//! Instead of single vertices the search expands horizontal intervals of
//! points that are all visible from a common base point. A path only turns
//! at corners of blocked tiles, which then become the base of new intervals.

use glam::IVec2;

use crate::{Error, ExtentCache, Grid, Path};

mod heuristic;
mod search;
mod snapshot;
mod state;
mod successors;

pub use heuristic::heuristic;
pub use search::{Search, SearchStatus};
pub use snapshot::{Snapshot, SnapshotItem};
pub use state::{AnyaState, StateKey};

/// Settings shared by every search started from one [`Anya`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Number of states to allocate room for up front
    pub initial_capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 11,
        }
    }
}

/// Path finder reusing its extent tables between queries.
///
/// The tables are rebuilt when the searched grid differs in size or tiles
/// from the last one.
#[derive(Debug, Default, Clone)]
pub struct Anya {
    cache: ExtentCache,
    options: SearchOptions,
}

impl Anya {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            cache: ExtentCache::new(),
            options,
        }
    }

    /// Prepares a search from `start` to `goal` without expanding anything.
    ///
    /// Fails if either vertex lies outside the grid.
    pub fn search<'a, G: Grid>(
        &'a mut self,
        grid: &'a G,
        start: IVec2,
        goal: IVec2,
    ) -> Result<Search<'a, G>, Error> {
        let extents = self.cache.get(grid);
        Search::new(grid, extents, start, goal, &self.options)
    }

    /// Finds the shortest path from `start` to `goal`.
    ///
    /// Returns an empty path if the goal cannot be reached.
    pub fn find_path<G: Grid>(
        &mut self,
        grid: &G,
        start: IVec2,
        goal: IVec2,
    ) -> Result<Path, Error> {
        Ok(self.search(grid, start, goal)?.run())
    }

    /// Forces the extent tables to be rebuilt on the next search
    pub fn invalidate(&mut self) {
        self.cache.invalidate()
    }

    /// Get a reference to the search options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Get a mutable reference to the search options.
    pub fn options_mut(&mut self) -> &mut SearchOptions {
        &mut self.options
    }
}

/// Finds the shortest path between two vertices of `grid` with a throwaway
/// [`Anya`]
pub fn compute_path<G: Grid>(grid: &G, start: IVec2, goal: IVec2) -> Result<Path, Error> {
    Anya::default().find_path(grid, start, goal)
}
