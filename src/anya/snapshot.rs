use glam::IVec2;

use crate::Fraction;

use super::AnyaState;

/// An interval as recorded in a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotItem {
    pub row: i32,
    pub x_l: Fraction,
    pub x_r: Fraction,
    pub base: IVec2,
}

impl From<&AnyaState> for SnapshotItem {
    fn from(state: &AnyaState) -> Self {
        Self {
            row: state.row,
            x_l: state.x_l,
            x_r: state.x_r,
            base: state.base,
        }
    }
}

/// Every interval generated so far, and the one to be expanded next
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub intervals: Vec<SnapshotItem>,
    pub next: Option<SnapshotItem>,
}
