use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Vertex ({x}, {y}) lies outside the {size_x}x{size_y} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        size_x: i32,
        size_y: i32,
    },
    #[error("Map row {row} has {found} tiles, expected {expected}")]
    RaggedMap { row: usize, expected: i32, found: i32 },
    #[error("Unknown map tile {0:?}")]
    InvalidTile(char),
    #[error("Fraction {0}/0 has a zero denominator")]
    ZeroDenominator(i64),
}
