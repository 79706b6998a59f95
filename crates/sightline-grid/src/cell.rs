//! Cell coordinates and the packed cell id shared by the visibility
//! precomputer and the runtime manager.

use glam::{Vec2, Vec3};

/// Multiplier used to pack a cell coordinate into a single integer.
///
/// `id = x * CELL_ID_SCALE + y`. Both axes must stay below this value, which
/// [`GridMap`](crate::GridMap) enforces at load time.
pub const CELL_ID_SCALE: u32 = 1000;

/// Integer coordinate of a grid cell.
///
/// `x` runs along world X, `y` runs along world Z. World height is not part
/// of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Column, along world X.
    pub x: u32,
    /// Row, along world Z.
    pub y: u32,
}

impl CellCoord {
    /// Create a cell coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Pack this coordinate into its [`CellId`].
    ///
    /// Coordinates must be below [`CELL_ID_SCALE`]; larger values alias.
    #[must_use]
    pub fn id(self) -> CellId {
        debug_assert!(self.x < CELL_ID_SCALE && self.y < CELL_ID_SCALE);
        CellId(self.x * CELL_ID_SCALE + self.y)
    }

    /// The cell containing a world-space position.
    ///
    /// Returns `None` for negative coordinates or coordinates beyond the
    /// addressable range.
    #[must_use]
    pub fn from_world(position: Vec3) -> Option<Self> {
        Self::from_plane(Vec2::new(position.x, position.z))
    }

    /// The cell containing a point on the ground plane (`x`, `z`).
    #[must_use]
    pub fn from_plane(point: Vec2) -> Option<Self> {
        let x = point.x.floor();
        let y = point.y.floor();
        let limit = CELL_ID_SCALE as f32;
        if !(0.0..limit).contains(&x) || !(0.0..limit).contains(&y) {
            return None;
        }
        Some(Self::new(x as u32, y as u32))
    }

    /// Centre of the cell on the ground plane.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/// Packed integer identifier of a cell, as stored in visibility files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// Unpack the id back into a coordinate.
    #[must_use]
    pub fn coord(self) -> CellCoord {
        CellCoord::new(self.0 / CELL_ID_SCALE, self.0 % CELL_ID_SCALE)
    }

    /// The cell id containing a world-space position, if addressable.
    #[must_use]
    pub fn from_world(position: Vec3) -> Option<Self> {
        CellCoord::from_world(position).map(CellCoord::id)
    }

    /// Raw packed value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CellCoord> for CellId {
    fn from(coord: CellCoord) -> Self {
        coord.id()
    }
}
