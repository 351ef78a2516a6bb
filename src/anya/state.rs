use glam::IVec2;

use crate::{heuristics::euclidean, Fraction};

/// Value identity of an interval state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub row: i32,
    pub x_l: Fraction,
    pub x_r: Fraction,
    pub base: IVec2,
}

/// A closed horizontal interval `[x_l, x_r]` on vertex row `row`, observed
/// from `base`.
///
/// Every point in the interval can be reached by a straight line from `base`,
/// and `g` is the cost of the best known path from the start to `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyaState {
    pub(crate) x_l: Fraction,
    pub(crate) x_r: Fraction,
    pub(crate) row: i32,
    pub(crate) base: IVec2,

    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) f: f32,
    pub(crate) parent: Option<usize>,
    pub(crate) visited: bool,
}

impl AnyaState {
    fn new(x_l: Fraction, x_r: Fraction, row: i32, base: IVec2, g: f32, parent: Option<usize>) -> Self {
        Self {
            x_l,
            x_r,
            row,
            base,
            g,
            h: 0.0,
            f: g,
            parent,
            visited: false,
        }
    }

    /// An interval seen directly from the start point
    pub fn start(x_l: Fraction, x_r: Fraction, row: i32, start: IVec2) -> Self {
        Self::new(x_l, x_r, row, start, 0.0, None)
    }

    /// An interval seen from the same base as `source`
    pub fn observable(x_l: Fraction, x_r: Fraction, row: i32, source: &AnyaState) -> Self {
        Self::new(x_l, x_r, row, source.base, source.g, source.parent)
    }

    /// An interval seen from `base`, a corner of `source`. The path turns at
    /// `base`, so `source` becomes the parent.
    pub fn unobservable(
        x_l: Fraction,
        x_r: Fraction,
        row: i32,
        base: IVec2,
        source: &AnyaState,
        source_handle: usize,
    ) -> Self {
        let g = source.g + euclidean(source.base.as_vec2(), base.as_vec2());
        Self::new(x_l, x_r, row, base, g, Some(source_handle))
    }

    pub fn key(&self) -> StateKey {
        StateKey {
            row: self.row,
            x_l: self.x_l,
            x_r: self.x_r,
            base: self.base,
        }
    }

    /// Returns true if `point` lies on this interval
    pub fn contains(&self, point: IVec2) -> bool {
        self.row == point.y && self.x_l <= point.x && self.x_r >= point.x
    }

    /// Get the state's left endpoint.
    pub fn x_l(&self) -> Fraction {
        self.x_l
    }

    /// Get the state's right endpoint.
    pub fn x_r(&self) -> Fraction {
        self.x_r
    }

    /// Get the state's row.
    pub fn row(&self) -> i32 {
        self.row
    }

    /// Get the state's base point.
    pub fn base(&self) -> IVec2 {
        self.base
    }

    /// Cost from the start to the base point
    pub fn g(&self) -> f32 {
        self.g
    }

    /// Estimated cost from the base point through the interval to the goal
    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn f(&self) -> f32 {
        self.f
    }

    /// Handle of the state this one was reached from
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns true once the state has been expanded
    pub fn visited(&self) -> bool {
        self.visited
    }
}
