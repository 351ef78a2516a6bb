use std::cmp::Ordering;

use glam::IVec2;
use smallvec::SmallVec;

use crate::{util::project, Extents, Fraction, Grid};

use super::AnyaState;

pub(crate) type Successors = SmallVec<[AnyaState; 8]>;

/// Vertical direction of travel away from an interval's row.
///
/// "Ahead" is the tile row being moved into, "behind" the one being left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    const BOTH: [Self; 2] = [Self::Up, Self::Down];

    fn next_row(self, row: i32) -> i32 {
        match self {
            Self::Up => row + 1,
            Self::Down => row - 1,
        }
    }

    fn ahead_left_blocked(self, grid: &impl Grid, x: i32, y: i32) -> bool {
        match self {
            Self::Up => grid.bottom_right_of_blocked_tile(x, y),
            Self::Down => grid.top_right_of_blocked_tile(x, y),
        }
    }

    fn ahead_right_blocked(self, grid: &impl Grid, x: i32, y: i32) -> bool {
        match self {
            Self::Up => grid.bottom_left_of_blocked_tile(x, y),
            Self::Down => grid.top_left_of_blocked_tile(x, y),
        }
    }

    fn behind_left_blocked(self, grid: &impl Grid, x: i32, y: i32) -> bool {
        match self {
            Self::Up => grid.top_right_of_blocked_tile(x, y),
            Self::Down => grid.bottom_right_of_blocked_tile(x, y),
        }
    }

    fn behind_right_blocked(self, grid: &impl Grid, x: i32, y: i32) -> bool {
        match self {
            Self::Up => grid.top_left_of_blocked_tile(x, y),
            Self::Down => grid.bottom_left_of_blocked_tile(x, y),
        }
    }

    fn left_extent(self, extents: &Extents, x: i32, y: i32) -> i32 {
        match self {
            Self::Up => extents.left_up(x, y),
            Self::Down => extents.left_down(x, y),
        }
    }

    fn right_extent(self, extents: &Extents, x: i32, y: i32) -> i32 {
        match self {
            Self::Up => extents.right_up(x, y),
            Self::Down => extents.right_down(x, y),
        }
    }
}

/// Where the points of a new interval are seen from
#[derive(Clone, Copy)]
enum Observer<'s> {
    Start(IVec2),
    /// Same base as the source interval
    Source(&'s AnyaState),
    /// A corner of the source interval, with the source's handle
    Corner(IVec2, usize, &'s AnyaState),
}

struct Generator<'a, G> {
    grid: &'a G,
    extents: &'a Extents,
    out: Successors,
}

/// Intervals observable from `start` in all four directions
pub(crate) fn start_states<G: Grid>(grid: &G, extents: &Extents, start: IVec2) -> Successors {
    let mut generator = Generator::new(grid, extents);
    let (x, y) = (start.x, start.y);
    let observer = Observer::Start(start);

    for dir in Direction::BOTH {
        let left_blocked = dir.ahead_left_blocked(grid, x, y);
        let right_blocked = dir.ahead_right_blocked(grid, x, y);
        if left_blocked && right_blocked {
            continue;
        }

        let left = if left_blocked {
            x
        } else {
            dir.left_extent(extents, x, y)
        };
        let right = if right_blocked {
            x
        } else {
            dir.right_extent(extents, x, y)
        };

        generator.split(dir, observer, left.into(), right.into(), y);
    }

    if !grid.top_right_of_blocked_tile(x, y) || !grid.bottom_right_of_blocked_tile(x, y) {
        generator.emit(observer, extents.left_any(x, y).into(), x.into(), y);
    }

    if !grid.top_left_of_blocked_tile(x, y) || !grid.bottom_left_of_blocked_tile(x, y) {
        generator.emit(observer, x.into(), extents.right_any(x, y).into(), y);
    }

    generator.out
}

/// Successors of the state stored at `handle`
pub(crate) fn successors<G: Grid>(
    grid: &G,
    extents: &Extents,
    handle: usize,
    state: &AnyaState,
) -> Successors {
    let mut generator = Generator::new(grid, extents);

    match state.base.y.cmp(&state.row) {
        Ordering::Equal => generator.explore_flat(handle, state),
        Ordering::Less => generator.explore_vertical(Direction::Up, handle, state),
        Ordering::Greater => generator.explore_vertical(Direction::Down, handle, state),
    }

    generator.out
}

impl<'a, G: Grid> Generator<'a, G> {
    fn new(grid: &'a G, extents: &'a Extents) -> Self {
        Self {
            grid,
            extents,
            out: SmallVec::new(),
        }
    }

    fn emit(&mut self, observer: Observer<'_>, x_l: Fraction, x_r: Fraction, row: i32) {
        if x_l > x_r {
            return;
        }

        let state = match observer {
            Observer::Start(start) => AnyaState::start(x_l, x_r, row, start),
            Observer::Source(source) => AnyaState::observable(x_l, x_r, row, source),
            Observer::Corner(base, handle, source) => {
                AnyaState::unobservable(x_l, x_r, row, base, source, handle)
            }
        };

        self.out.push(state);
    }

    /// Emits `[x_l, x_r]` on the row after `row` in `dir`, cut wherever the
    /// tile row beyond it changes between blocked and open.
    fn split(
        &mut self,
        dir: Direction,
        observer: Observer<'_>,
        mut x_l: Fraction,
        x_r: Fraction,
        row: i32,
    ) {
        let row = dir.next_row(row);
        let mut left = x_l.floor();

        loop {
            let run_end = dir.right_extent(self.extents, left, row);
            if x_r <= run_end {
                break;
            }

            self.emit(observer, x_l, run_end.into(), row);
            left = run_end;
            x_l = run_end.into();
        }

        self.emit(observer, x_l, x_r, row);
    }

    /// The base lies on the interval's row, past one of its ends. The
    /// endpoints are whole numbers.
    fn explore_flat(&mut self, handle: usize, state: &AnyaState) {
        let (grid, extents) = (self.grid, self.extents);
        let y = state.row;
        debug_assert!(state.x_l.is_whole_number() && state.x_r.is_whole_number());

        if state.x_r <= state.base.x {
            // Heading left
            let x = state.x_l.floor();
            let pivot = Observer::Corner(IVec2::new(x, y), handle, state);

            //       |XXXXXXXX|
            // ----- P========B
            let wall = Direction::BOTH
                .into_iter()
                .find(|dir| dir.ahead_right_blocked(grid, x, y));

            if let Some(dir) = wall {
                if !dir.ahead_left_blocked(grid, x, y) {
                    let bound = dir.left_extent(extents, x, y);
                    self.split(dir, pivot, bound.into(), state.x_l, y);
                }
            }

            if !grid.bottom_right_of_blocked_tile(x, y) || !grid.top_right_of_blocked_tile(x, y) {
                self.emit(Observer::Source(state), extents.left_any(x, y).into(), x.into(), y);
            }
        } else {
            // Heading right
            let x = state.x_r.floor();
            let pivot = Observer::Corner(IVec2::new(x, y), handle, state);

            let wall = Direction::BOTH
                .into_iter()
                .find(|dir| dir.ahead_left_blocked(grid, x, y));

            if let Some(dir) = wall {
                if !dir.ahead_right_blocked(grid, x, y) {
                    let bound = dir.right_extent(extents, x, y);
                    self.split(dir, pivot, state.x_r, bound.into(), y);
                }
            }

            if !grid.bottom_left_of_blocked_tile(x, y) || !grid.top_left_of_blocked_tile(x, y) {
                self.emit(Observer::Source(state), x.into(), extents.right_any(x, y).into(), y);
            }
        }
    }

    /// The base lies behind the interval's row as seen travelling in `dir`
    fn explore_vertical(&mut self, dir: Direction, handle: usize, state: &AnyaState) {
        let (grid, extents) = (self.grid, self.extents);
        let (base, y) = (state.base, state.row);
        let (x_l, x_r) = (state.x_l, state.x_r);
        let dy = (y - base.y).abs();

        if dir.ahead_right_blocked(grid, x_l.floor(), y) {
            // Wall ahead. Only the corners at the interval's ends let the
            // path continue.
            if x_l.is_whole_number() {
                let x = x_l.floor();
                if x < base.x && !dir.ahead_left_blocked(grid, x, y) {
                    let left = project(base.x, x.into(), dy)
                        .max(dir.left_extent(extents, x, y).into());
                    let pivot = Observer::Corner(IVec2::new(x, y), handle, state);
                    self.split(dir, pivot, left, x_l, y);
                }
            }

            if x_r.is_whole_number() {
                let x = x_r.floor();
                if base.x < x && !dir.ahead_right_blocked(grid, x, y) {
                    let right = project(base.x, x.into(), dy)
                        .min(dir.right_extent(extents, x, y).into());
                    let pivot = Observer::Corner(IVec2::new(x, y), handle, state);
                    self.split(dir, pivot, x_r, right, y);
                }
            }
        } else {
            // =======      =====    =====
            //  \   /       / .'      '. \
            //   \ /   OR  /.'    OR    '.\
            //    B       B                B
            let left = project(base.x, x_l, dy)
                .max(dir.left_extent(extents, x_l.floor() + 1, y).into());
            let right = project(base.x, x_r, dy)
                .min(dir.right_extent(extents, x_r.ceil() - 1, y).into());

            if left < right {
                self.split(dir, Observer::Source(state), left, right, y);
            }
        }

        if x_l.is_whole_number() {
            let x = x_l.floor();
            if dir.behind_left_blocked(grid, x, y) && !dir.ahead_left_blocked(grid, x, y) {
                // .------P======
                // |XXXXXX|\   /
                //           B
                let pivot = Observer::Corner(IVec2::new(x, y), handle, state);
                self.emit(pivot, extents.left_any(x, y).into(), x.into(), y);

                let projection = project(base.x, x.into(), dy);
                let bound = dir.left_extent(extents, x, y);
                if projection > bound {
                    self.split(dir, pivot, bound.into(), projection, y);
                }
            }
        }

        if x_r.is_whole_number() {
            let x = x_r.floor();
            if dir.behind_right_blocked(grid, x, y) && !dir.ahead_right_blocked(grid, x, y) {
                let pivot = Observer::Corner(IVec2::new(x, y), handle, state);
                self.emit(pivot, x.into(), extents.right_any(x, y).into(), y);

                let projection = project(base.x, x.into(), dy);
                let bound = dir.right_extent(extents, x, y);
                if projection < bound {
                    self.split(dir, pivot, projection, bound.into(), y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::GridGraph;

    use super::*;

    fn intervals(states: &[AnyaState]) -> Vec<(i32, Fraction, Fraction, IVec2)> {
        let mut v = states
            .iter()
            .map(|s| (s.row, s.x_l, s.x_r, s.base))
            .collect::<Vec<_>>();
        v.sort_by_key(|&(row, x_l, x_r, base)| (row, x_l, x_r, base.x, base.y));
        v
    }

    #[test]
    fn start_in_open_grid() {
        let grid = GridGraph::new(4, 4);
        let extents = Extents::build(&grid);
        let start = IVec2::new(2, 2);

        let states = start_states(&grid, &extents, start);
        let f = |x: i32| Fraction::from(x);

        assert_eq!(
            intervals(&states),
            [
                (1, f(0), f(4), start),
                (2, f(0), f(2), start),
                (2, f(2), f(4), start),
                (3, f(0), f(4), start),
            ]
        );
    }

    #[test]
    fn start_beside_wall() {
        // Tile (2, 2) blocked, start at its bottom left corner
        let grid = GridGraph::from_ascii(
            "....\n\
             ..#.\n\
             ....\n\
             ....",
        )
        .unwrap();
        let extents = Extents::build(&grid);
        let start = IVec2::new(2, 2);

        let states = start_states(&grid, &extents, start);

        // Upwards only towards the left of the wall
        assert!(states
            .iter()
            .any(|s| s.row == 3 && s.x_l == 0 && s.x_r == 2));
        assert!(states.iter().all(|s| !(s.row == 3 && s.x_r > 2)));
        assert!(states.iter().all(|s| s.base == start && s.parent.is_none()));
    }

    #[test]
    fn observable_successor_widens() {
        let grid = GridGraph::new(8, 4);
        let extents = Extents::build(&grid);
        let source = AnyaState::start(Fraction::from(3), Fraction::from(5), 1, IVec2::new(4, 0));

        let next = successors(&grid, &extents, 0, &source);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].row, 2);
        assert_eq!(next[0].x_l, Fraction::from(2));
        assert_eq!(next[0].x_r, Fraction::from(6));
        assert_eq!(next[0].base, source.base);
    }

    #[test]
    fn turns_around_corner() {
        // Wall above the right half of row 2
        let grid = GridGraph::from_ascii(
            "........\n\
             ........\n\
             ....####\n\
             ........\n\
             ........",
        )
        .unwrap();
        let extents = Extents::build(&grid);
        let base = IVec2::new(6, 0);
        let source = AnyaState::start(Fraction::from(4), Fraction::from(8), 2, base);

        let next = successors(&grid, &extents, 3, &source);

        let turn = next
            .iter()
            .find(|s| s.base == IVec2::new(4, 2))
            .expect("no successor turning at the corner");
        assert_eq!(turn.row, 3);
        assert_eq!(turn.parent, Some(3));
        assert!(turn.x_r <= 4);
    }

    #[test]
    fn turns_around_corner_below() {
        // Wall below the right half of row 3, seen from above
        let grid = GridGraph::from_ascii(
            "........\n\
             ........\n\
             ....####\n\
             ........\n\
             ........",
        )
        .unwrap();
        let extents = Extents::build(&grid);
        let base = IVec2::new(6, 5);
        let source = AnyaState::start(Fraction::from(4), Fraction::from(8), 3, base);

        let next = successors(&grid, &extents, 3, &source);
        let f = |x: i32| Fraction::from(x);

        // The ray through (4, 3) continues to x = 3 on row 2
        assert_eq!(intervals(&next), [(2, f(3), f(4), IVec2::new(4, 3))]);
        assert_eq!(next[0].parent, Some(3));
        assert_relative_eq!(next[0].g, 8f32.sqrt());
    }

    #[test]
    fn flat_interval_turns_at_obstacle() {
        // Interval running left along the bottom of a block
        let grid = GridGraph::from_ascii(
            "........\n\
             ....##..\n\
             ........",
        )
        .unwrap();
        let extents = Extents::build(&grid);
        let base = IVec2::new(6, 1);
        let source = AnyaState::start(Fraction::from(4), Fraction::from(6), 1, base);

        let next = successors(&grid, &extents, 5, &source);
        let f = |x: i32| Fraction::from(x);

        assert_eq!(
            intervals(&next),
            [
                // Straight on along the row
                (1, f(0), f(4), base),
                // Up and left past the block's corner
                (2, f(0), f(4), IVec2::new(4, 1)),
            ]
        );

        let turn = next.iter().find(|s| s.row == 2).unwrap();
        assert_eq!(turn.parent, Some(5));
        assert_relative_eq!(turn.g, 2.0);
    }
}
