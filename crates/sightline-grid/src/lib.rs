//! Grid map loading, cell addressing, and world-to-cell mapping.
//!
//! The grid is the static description of a level: a rectangle of cells that
//! are either walls, floor, or the placement point of an object template.
//! It is parsed once at startup and never mutated afterwards.

mod cell;
mod error;
mod map;

pub use cell::{CELL_ID_SCALE, CellCoord, CellId};
pub use error::GridError;
pub use map::{CellKind, GridMap, MAX_GRID_DIMENSION};
