use std::ops::{Deref, DerefMut};

use glam::IVec2;
use itertools::Itertools;

/// Sequence of grid vertices from start to goal, joined by straight segments.
///
/// An empty path means the goal could not be reached.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<IVec2>,
}

impl Path {
    pub fn new(points: Vec<IVec2>) -> Self {
        Self { points }
    }

    /// Get a reference to the path's points.
    pub fn points(&self) -> &[IVec2] {
        self.points.as_ref()
    }

    pub fn push(&mut self, value: IVec2) {
        self.points.push(value)
    }

    /// Total Euclidean length of all segments
    pub fn length(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| (*b - *a).as_dvec2().length())
            .sum()
    }
}

impl Deref for Path {
    type Target = [IVec2];

    fn deref(&self) -> &Self::Target {
        self.points.deref()
    }
}

impl DerefMut for Path {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.points.deref_mut()
    }
}

impl From<Vec<IVec2>> for Path {
    fn from(points: Vec<IVec2>) -> Self {
        Self::new(points)
    }
}
