//! `sightline precompute`: build a visibility file for a map.

use std::path::Path;
use std::time::Instant;

use sightline_config::VisibilityConfig;
use sightline_grid::GridMap;
use sightline_pvs::{PrecomputeOptions, PvsError, precompute};
use tracing::info;

use crate::error::AppError;

/// What a precompute run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputeSummary {
    /// Cells with a non-empty visible set.
    pub cells: usize,
    /// Total `(from, to)` pairs written.
    pub pairs: usize,
}

/// Options for the precomputer taken from the `visibility` config section.
pub fn options_from(config: &VisibilityConfig) -> PrecomputeOptions {
    PrecomputeOptions {
        samples: config.samples,
        seed: config.seed,
        workers: config.workers,
        batch_size: config.batch_size,
    }
}

/// Header line naming the inputs a visibility file was built from.
pub fn header(grid: &GridMap, options: &PrecomputeOptions) -> String {
    format!(
        "sightline pvs {}x{} samples={} seed={:#x} batch={}",
        grid.width(),
        grid.height(),
        options.samples,
        options.seed,
        options.batch_size
    )
}

/// Load `map`, sample it, and write the table to `out`.
pub fn run(map: &Path, out: &Path, config: &VisibilityConfig) -> Result<PrecomputeSummary, AppError> {
    let start = Instant::now();
    let grid = GridMap::load(map)?;
    info!(
        map = %map.display(),
        width = grid.width(),
        height = grid.height(),
        walls = grid.wall_count(),
        "Loaded map"
    );

    let options = options_from(config);
    let table = precompute(&grid, &options)?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| PvsError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    table.save(out, &header(&grid, &options))?;

    let summary = PrecomputeSummary {
        cells: table.len(),
        pairs: table.total_pairs(),
    };
    info!(
        out = %out.display(),
        cells = summary.cells,
        pairs = summary.pairs,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wrote visibility file"
    );
    Ok(summary)
}
