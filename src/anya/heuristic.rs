use glam::{IVec2, Vec2};

use crate::heuristics::euclidean;

use super::AnyaState;

/// Length of the shortest path from the state's base point to `goal` that
/// passes through the state's interval, ignoring obstacles.
///
/// This never overestimates, as any real path must also cross the interval.
pub fn heuristic(state: &AnyaState, goal: IVec2) -> f32 {
    let base = state.base;
    let row = state.row;
    let (x_l, x_r) = (state.x_l, state.x_r);

    // Base, goal and interval all on one row
    if row == base.y && row == goal.y {
        return if x_l > base.x && x_l > goal.x {
            2.0 * x_l.to_f32() - base.x as f32 - goal.x as f32
        } else if x_r < base.x && x_r < goal.x {
            (base.x + goal.x) as f32 - 2.0 * x_r.to_f32()
        } else {
            (base.x - goal.x).abs() as f32
        };
    }

    let dy_base = base.y - row;
    let dy_goal = goal.y - row;

    // Mirror the goal across the row if it is on the same side as the base
    let goal_y = if dy_base * dy_goal > 0 {
        2 * row - goal.y
    } else {
        goal.y
    };

    //  G
    //   '.
    // ----X----- row
    //      '.
    //        B
    let crossing = base.x as f32
        + (row - base.y) as f32 * (goal.x - base.x) as f32 / (goal_y - base.y) as f32;
    let crossing = Vec2::new(crossing.max(x_l.to_f32()).min(x_r.to_f32()), row as f32);

    euclidean(base.as_vec2(), crossing) + euclidean(crossing, goal.as_vec2())
}
