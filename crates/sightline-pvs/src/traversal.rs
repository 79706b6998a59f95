//! Cell-by-cell walk along a chord, and the run splitting that turns a walk
//! into visibility pairs.

use sightline_grid::{CellCoord, GridMap};

use crate::chord::Chord;
use crate::table::PvsTable;

/// Substitute for a zero slope component so the crossing parameters stay
/// finite.
pub const SLOPE_EPSILON: f64 = 1e-6;

/// A cell crossed by a chord, in traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversedCell {
    /// The crossed cell.
    pub coord: CellCoord,
    /// Whether the cell blocks visibility.
    pub wall: bool,
}

/// Walk `chord` across `grid`, returning every crossed cell in order.
///
/// The walk advances to whichever cell boundary the chord crosses next;
/// when a vertical and a horizontal boundary are crossed at the same
/// parameter, both axes advance together. It stops once the current cell
/// leaves the map.
pub fn traverse(grid: &GridMap, chord: &Chord) -> Vec<TraversedCell> {
    let (width, height) = (grid.width() as i64, grid.height() as i64);

    let mut slope = chord.direction();
    if slope.x == 0.0 {
        slope.x = SLOPE_EPSILON;
    }
    if slope.y == 0.0 {
        slope.y = SLOPE_EPSILON;
    }

    let step_x: i64 = if slope.x > 0.0 { 1 } else { -1 };
    let step_y: i64 = if slope.y > 0.0 { 1 } else { -1 };

    let mut cell_x = start_cell(chord.start.x, width);
    let mut cell_y = start_cell(chord.start.y, height);

    // Chord parameter at which the next vertical (x) or horizontal (y)
    // boundary is crossed, and the parameter span of one whole cell.
    let mut next_x = (boundary(cell_x, step_x) - chord.start.x) / slope.x;
    let mut next_y = (boundary(cell_y, step_y) - chord.start.y) / slope.y;
    let span_x = 1.0 / slope.x.abs();
    let span_y = 1.0 / slope.y.abs();

    let max_steps = (width + height + 2) as usize;
    let mut cells = Vec::with_capacity(max_steps);

    while (0..width).contains(&cell_x) && (0..height).contains(&cell_y) {
        let coord = CellCoord::new(cell_x as u32, cell_y as u32);
        cells.push(TraversedCell {
            coord,
            wall: grid.is_wall(coord),
        });
        if cells.len() >= max_steps {
            break;
        }

        if next_x < next_y {
            cell_x += step_x;
            next_x += span_x;
        } else if next_y < next_x {
            cell_y += step_y;
            next_y += span_y;
        } else {
            cell_x += step_x;
            cell_y += step_y;
            next_x += span_x;
            next_y += span_y;
        }
    }

    cells
}

/// Split a traversal into maximal runs of consecutive open cells.
///
/// A run ends at a wall or at the end of the traversal. Walls themselves
/// belong to no run.
pub fn open_runs(cells: &[TraversedCell]) -> impl Iterator<Item = &[TraversedCell]> {
    cells.split(|cell| cell.wall).filter(|run| !run.is_empty())
}

/// Mark every ordered pair of cells in `run` as mutually visible,
/// self-pairs included.
pub fn accumulate_run(table: &mut PvsTable, run: &[TraversedCell]) {
    for a in run {
        let from = a.coord.id();
        for b in run {
            table.insert(from, b.coord.id());
        }
    }
}

/// First cell of a walk starting at coordinate `c` on an axis of `size`
/// cells. A start exactly on the far edge belongs to the last cell.
fn start_cell(c: f64, size: i64) -> i64 {
    (c.floor() as i64).clamp(0, size - 1)
}

/// Coordinate of the next cell boundary when moving in direction `step`.
fn boundary(cell: i64, step: i64) -> f64 {
    if step > 0 {
        (cell + 1) as f64
    } else {
        cell as f64
    }
}
