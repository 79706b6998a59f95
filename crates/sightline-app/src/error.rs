//! Failures that stop a subcommand.

use sightline_grid::GridError;
use sightline_lod::LodError;
use sightline_pvs::PvsError;

/// Any error a subcommand can hit while loading or writing level data.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The grid map could not be loaded.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The visibility file could not be read, written, or built.
    #[error(transparent)]
    Pvs(#[from] PvsError),

    /// The object catalog is inconsistent.
    #[error("invalid catalog: {0}")]
    Lod(#[from] LodError),
}
