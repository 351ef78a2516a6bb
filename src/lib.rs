pub mod anya;
mod error;
mod extents;
mod fraction;
mod grid;
pub mod heap;
pub mod heuristics;
mod path;
mod util;

pub use anya::{compute_path, Anya, SearchOptions};
pub use error::*;
pub use extents::*;
pub use fraction::*;
pub use grid::*;
pub use path::*;
