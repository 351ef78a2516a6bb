use crate::Fraction;

/// Extends the ray from `(base_x, base_y)` through `(x, row)` by one more row
/// and returns where it lands, `dy` being the vertical distance between base
/// and `row`.
///
/// `(x - base_x) * (dy + 1) / dy + base_x`
pub(crate) fn project(base_x: i32, x: Fraction, dy: i32) -> Fraction {
    debug_assert!(dy > 0);
    (x - base_x).multiply_divide(dy + 1, dy) + base_x
}
