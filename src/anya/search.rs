use std::collections::{hash_map::Entry, HashMap};

use glam::IVec2;
use itertools::Itertools;
use log::{debug, trace};

use crate::{heap::IndirectHeap, Error, Extents, Grid, Path};

use super::{
    heuristic::heuristic,
    successors::{start_states, successors},
    AnyaState, SearchOptions, Snapshot, SnapshotItem, StateKey,
};

/// Progress of a [`Search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Searching,
    /// The goal lies on the interval with this handle
    Found(usize),
    /// Every reachable interval has been expanded without meeting the goal
    Exhausted,
}

/// A single query between two vertices, advanced one expansion at a time.
///
/// States live in an arena indexed by their heap handle, so a handle names
/// the same state for the whole search. Dropping the search abandons it.
pub struct Search<'a, G> {
    grid: &'a G,
    extents: &'a Extents,
    start: IVec2,
    goal: IVec2,

    states: Vec<AnyaState>,
    heap: IndirectHeap,
    existing: HashMap<StateKey, usize>,

    status: SearchStatus,
    expanded: usize,
}

impl<'a, G: Grid> Search<'a, G> {
    pub(crate) fn new(
        grid: &'a G,
        extents: &'a Extents,
        start: IVec2,
        goal: IVec2,
        options: &SearchOptions,
    ) -> Result<Self, Error> {
        for point in [start, goal] {
            if !grid.is_valid_coordinate(point.x, point.y) {
                return Err(Error::OutOfBounds {
                    x: point.x,
                    y: point.y,
                    size_x: grid.size_x(),
                    size_y: grid.size_y(),
                });
            }
        }

        debug!(
            "Searching from {} to {} on {}x{} grid",
            start,
            goal,
            grid.size_x(),
            grid.size_y()
        );

        let mut search = Self {
            grid,
            extents,
            start,
            goal,
            states: Vec::with_capacity(options.initial_capacity),
            heap: IndirectHeap::with_capacity(options.initial_capacity),
            existing: HashMap::with_capacity(options.initial_capacity),
            status: SearchStatus::Searching,
            expanded: 0,
        };

        for state in start_states(grid, extents, start) {
            search.admit(state);
        }

        Ok(search)
    }

    /// Expands the best open interval, unless the search is already over.
    pub fn step(&mut self) -> SearchStatus {
        if self.status != SearchStatus::Searching {
            return self.status;
        }

        if self.heap.is_empty() {
            debug!(
                "No path from {} to {} after {} expansions",
                self.start, self.goal, self.expanded
            );
            self.status = SearchStatus::Exhausted;
            return self.status;
        }

        let handle = self.heap.pop_min_index();
        self.expanded += 1;

        self.states[handle].visited = true;
        let state = &self.states[handle];
        trace!(
            "Expanding [{}, {}] on row {} from {} with f = {}",
            state.x_l,
            state.x_r,
            state.row,
            state.base,
            state.f
        );

        if state.contains(self.goal) {
            debug!(
                "Found path from {} to {} of cost {} after {} expansions, {} generated",
                self.start,
                self.goal,
                state.g + state.base.as_vec2().distance(self.goal.as_vec2()),
                self.expanded,
                self.states.len()
            );
            self.status = SearchStatus::Found(handle);
            return self.status;
        }

        for successor in successors(self.grid, self.extents, handle, &self.states[handle]) {
            self.admit(successor);
        }

        self.status
    }

    /// Steps until the search terminates and returns the resulting path
    pub fn run(&mut self) -> Path {
        while self.step() == SearchStatus::Searching {}
        self.path()
    }

    /// Like [`Search::run`], showing `observer` a snapshot before every
    /// expansion
    pub fn run_with(&mut self, mut observer: impl FnMut(&Snapshot)) -> Path {
        while self.status == SearchStatus::Searching {
            if !self.heap.is_empty() {
                observer(&self.snapshot());
            }
            self.step();
        }

        self.path()
    }

    /// Inserts a new state, or relaxes the known one with the same identity
    /// if the new route to it is cheaper.
    ///
    /// A successor's `g` already equals its source's cost plus the straight
    /// distance from the source's base to its own.
    fn admit(&mut self, mut state: AnyaState) {
        match self.existing.entry(state.key()) {
            Entry::Vacant(entry) => {
                state.h = heuristic(&state, self.goal);
                state.f = state.g + state.h;

                let handle = self.heap.insert(state.f);
                debug_assert_eq!(handle, self.states.len());

                entry.insert(handle);
                self.states.push(state);
            }
            Entry::Occupied(entry) => {
                let handle = *entry.get();
                let existing = &mut self.states[handle];

                if existing.visited || state.g >= existing.g {
                    return;
                }

                existing.g = state.g;
                existing.f = existing.g + existing.h;
                existing.parent = state.parent;
                self.heap.decrease_key(handle, existing.f);
            }
        }
    }

    /// The path found so far. Empty unless the search has found the goal.
    ///
    /// Consists of every turning point from the start followed by the goal.
    pub fn path(&self) -> Path {
        let handle = match self.status {
            SearchStatus::Found(handle) => handle,
            _ => return Path::default(),
        };

        let mut points = vec![self.goal];
        let mut current = Some(handle);
        while let Some(handle) = current {
            let state = &self.states[handle];
            points.push(state.base);
            current = state.parent;
        }

        points.reverse();
        Path::new(points)
    }

    /// Every interval generated so far, and the best open one
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            intervals: self.states.iter().map(SnapshotItem::from).collect_vec(),
            next: self
                .heap
                .peek_min_handle()
                .map(|handle| SnapshotItem::from(&self.states[handle])),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn start(&self) -> IVec2 {
        self.start
    }

    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    /// All states generated so far, indexed by handle
    pub fn states(&self) -> &[AnyaState] {
        self.states.as_ref()
    }

    /// Number of states still waiting to be expanded
    pub fn open(&self) -> usize {
        self.heap.len()
    }

    /// Number of states popped so far
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of distinct states created so far
    pub fn generated(&self) -> usize {
        self.states.len()
    }
}
