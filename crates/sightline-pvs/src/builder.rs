//! Offline precomputation of a [`PvsTable`] from a grid.
//!
//! Samples are cut into fixed-size batches. Each batch draws from its own
//! RNG derived from the run seed and the batch index, so the result depends
//! only on the grid, the sample count, the seed, and the batch size, and not
//! on how many workers share the work. Workers fill private tables; the
//! calling thread is the only place tables are merged.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use crossbeam_channel::unbounded;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sightline_grid::GridMap;
use tracing::{debug, info};

use crate::chord::Chord;
use crate::error::PvsError;
use crate::table::PvsTable;
use crate::traversal::{accumulate_run, open_runs, traverse};

/// Parameters for a precompute run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecomputeOptions {
    /// Number of random chords to sample.
    pub samples: u64,
    /// Seed for the chord RNG. Equal seeds give equal tables.
    pub seed: u64,
    /// Worker thread count. `0` uses one worker per logical CPU.
    pub workers: usize,
    /// Chords per batch. Changing it changes which chords are drawn.
    pub batch_size: u64,
}

impl Default for PrecomputeOptions {
    fn default() -> Self {
        Self {
            samples: 50_000,
            seed: 0x5EED,
            workers: 0,
            batch_size: 1024,
        }
    }
}

impl PrecomputeOptions {
    /// Number of batches the samples are cut into.
    pub fn batch_count(&self) -> u64 {
        self.samples.div_ceil(self.batch_size.max(1))
    }

    /// Number of chords in batch `batch`; the last batch may be short.
    pub fn batch_len(&self, batch: u64) -> u64 {
        let size = self.batch_size.max(1);
        self.samples.saturating_sub(batch * size).min(size)
    }

    fn resolved_workers(&self) -> usize {
        let workers = if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        };
        let batches = usize::try_from(self.batch_count()).unwrap_or(usize::MAX);
        workers.clamp(1, batches.max(1))
    }
}

/// Derive the RNG seed for one batch from the run seed.
pub fn batch_seed(seed: u64, batch: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    batch.hash(&mut hasher);
    hasher.finish()
}

/// Sample `count` chords with `rng` and accumulate their open runs into
/// `table`.
pub fn sample_chords<R: Rng + ?Sized>(
    grid: &GridMap,
    table: &mut PvsTable,
    rng: &mut R,
    count: u64,
) {
    for _ in 0..count {
        let chord = Chord::sample(rng, grid.width(), grid.height());
        let cells = traverse(grid, &chord);
        for run in open_runs(&cells) {
            accumulate_run(table, run);
        }
    }
}

/// Build the potentially visible set of `grid`.
///
/// # Errors
///
/// Returns [`PvsError::Spawn`] if a worker thread cannot be started.
pub fn precompute(grid: &GridMap, options: &PrecomputeOptions) -> Result<PvsTable, PvsError> {
    let start = Instant::now();
    let batches = options.batch_count();
    let workers = options.resolved_workers();
    info!(
        width = grid.width(),
        height = grid.height(),
        samples = options.samples,
        seed = options.seed,
        batches,
        workers,
        "Precomputing visibility"
    );

    let (batch_sender, batch_receiver) = unbounded::<u64>();
    for batch in 0..batches {
        // The receiver is still alive, so this cannot fail.
        let _ = batch_sender.send(batch);
    }
    drop(batch_sender);

    let (table_sender, table_receiver) = unbounded::<(usize, u64, PvsTable)>();
    let mut merged = PvsTable::new();

    std::thread::scope(|scope| -> Result<(), PvsError> {
        for worker in 0..workers {
            let batch_receiver = batch_receiver.clone();
            let table_sender = table_sender.clone();
            std::thread::Builder::new()
                .name(format!("pvs-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    let mut local = PvsTable::new();
                    let mut done = 0u64;
                    while let Ok(batch) = batch_receiver.recv() {
                        let mut rng = ChaCha8Rng::seed_from_u64(batch_seed(options.seed, batch));
                        sample_chords(grid, &mut local, &mut rng, options.batch_len(batch));
                        done += 1;
                    }
                    let _ = table_sender.send((worker, done, local));
                })
                .map_err(PvsError::Spawn)?;
        }
        drop(table_sender);

        for (worker, done, table) in table_receiver {
            debug!(worker, batches = done, cells = table.len(), "Merging worker table");
            merged.merge(table);
        }
        Ok(())
    })?;

    info!(
        cells = merged.len(),
        pairs = merged.total_pairs(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Visibility precompute finished"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_grid::{CellCoord, CellKind};

    fn options(samples: u64, seed: u64, workers: usize) -> PrecomputeOptions {
        PrecomputeOptions {
            samples,
            seed,
            workers,
            batch_size: 256,
        }
    }

    #[test]
    fn test_center_of_open_3x3_sees_every_cell() {
        let grid = GridMap::open(3, 3).unwrap();
        let table = precompute(&grid, &options(50_000, 42, 2)).unwrap();
        let center = CellCoord::new(1, 1).id();
        let visible = table.visible_from(center).unwrap();
        for (coord, _) in grid.cells() {
            assert!(visible.contains(&coord.id()), "center cannot see {coord:?}");
        }
        assert_eq!(visible.len(), 9);
    }

    #[test]
    fn test_result_does_not_depend_on_worker_count() {
        let mut cells = vec![CellKind::Floor; 36];
        cells[14] = CellKind::Wall;
        cells[15] = CellKind::Wall;
        cells[21] = CellKind::Wall;
        let grid = GridMap::new(6, 6, cells).unwrap();

        let single = precompute(&grid, &options(3_000, 9, 1)).unwrap();
        let many = precompute(&grid, &options(3_000, 9, 4)).unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn test_different_seeds_can_differ() {
        let grid = GridMap::open(40, 40).unwrap();
        let a = precompute(&grid, &options(20, 1, 1)).unwrap();
        let b = precompute(&grid, &options(20, 2, 1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_walls_never_appear_in_the_table() {
        let mut cells = vec![CellKind::Floor; 25];
        cells[12] = CellKind::Wall;
        let grid = GridMap::new(5, 5, cells).unwrap();
        let wall = CellCoord::new(2, 2).id();
        let table = precompute(&grid, &options(5_000, 3, 2)).unwrap();

        assert!(table.visible_from(wall).is_none());
        assert!(table.iter().all(|(_, set)| !set.contains(&wall)));
    }

    #[test]
    fn test_fully_walled_map_sees_nothing() {
        let grid = GridMap::new(2, 2, vec![CellKind::Wall; 4]).unwrap();
        let table = precompute(&grid, &options(500, 5, 1)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_zero_samples_gives_empty_table() {
        let grid = GridMap::open(4, 4).unwrap();
        let table = precompute(&grid, &options(0, 5, 3)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_batches_cover_exactly_the_sample_count() {
        let opts = PrecomputeOptions {
            samples: 1000,
            batch_size: 300,
            ..PrecomputeOptions::default()
        };
        assert_eq!(opts.batch_count(), 4);
        let total: u64 = (0..opts.batch_count()).map(|b| opts.batch_len(b)).sum();
        assert_eq!(total, 1000);
        assert_eq!(opts.batch_len(3), 100);
    }

    #[test]
    fn test_batch_seeds_are_distinct() {
        assert_ne!(batch_seed(1, 0), batch_seed(1, 1));
        assert_ne!(batch_seed(1, 0), batch_seed(2, 0));
        assert_eq!(batch_seed(7, 3), batch_seed(7, 3));
    }
}
