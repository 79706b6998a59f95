//! Potentially-visible-set precomputation and storage.
//!
//! The [`PvsTable`] maps every grid cell to the cells that can be seen from
//! it. It is built offline by [`precompute`], which fires random chords
//! across the map, walks each one cell by cell, and marks every pair of cells
//! sharing an unobstructed stretch of the chord as mutually visible. The
//! result is a Monte-Carlo approximation: coverage grows with the sample
//! count but is never guaranteed complete.

mod builder;
mod chord;
mod error;
mod table;
mod traversal;

pub use builder::{PrecomputeOptions, batch_seed, precompute, sample_chords};
pub use chord::{BoundarySide, Chord};
pub use error::PvsError;
pub use table::{CellSet, PvsTable};
pub use traversal::{SLOPE_EPSILON, TraversedCell, accumulate_run, open_runs, traverse};
