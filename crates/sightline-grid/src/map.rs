//! Text map parsing and the immutable [`GridMap`].
//!
//! ## File format
//!
//! ```text
//! <width>
//! <height>
//! <value for cell (0, 0)>
//! <value for cell (1, 0)>
//! ...
//! <value for cell (width - 1, height - 1)>
//! ```
//!
//! Values are listed row by row with `x` varying fastest. `0` is a wall,
//! `1`..=`3` place an object template, and any other value is plain floor.

use std::path::Path;

use glam::Vec2;

use crate::cell::{CELL_ID_SCALE, CellCoord};
use crate::error::GridError;

/// Largest width or height a map may declare.
pub const MAX_GRID_DIMENSION: u32 = CELL_ID_SCALE;

/// Classification of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Blocks line of sight and holds a wall instance.
    Wall,
    /// Open cell holding an instance of the object template with this map value.
    Object(u8),
    /// Open, empty cell.
    Floor,
}

impl CellKind {
    /// Decode a raw map value.
    pub fn from_value(value: i64) -> Self {
        match value {
            0 => Self::Wall,
            1..=3 => Self::Object(value as u8),
            _ => Self::Floor,
        }
    }

    /// Whether the cell blocks visibility.
    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// A parsed, immutable grid map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl GridMap {
    /// Build a map from already-classified cells in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or too large, or if the cell
    /// count does not match `width * height`.
    pub fn new(width: u32, height: u32, cells: Vec<CellKind>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyMap { width, height });
        }
        for dim in [width, height] {
            if dim > MAX_GRID_DIMENSION {
                return Err(GridError::TooLarge(dim));
            }
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A map with no walls and no objects.
    ///
    /// # Errors
    ///
    /// Same dimension checks as [`GridMap::new`].
    pub fn open(width: u32, height: u32) -> Result<Self, GridError> {
        Self::new(
            width,
            height,
            vec![CellKind::Floor; width as usize * height as usize],
        )
    }

    /// Parse the textual map format.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] for a missing header, a non-integer line, or an
    /// inconsistent cell count.
    pub fn parse(contents: &str) -> Result<Self, GridError> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let width = parse_dimension(lines.next(), "width")?;
        let height = parse_dimension(lines.next(), "height")?;

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for (line, content) in lines {
            cells.push(CellKind::from_value(parse_int(line, content)?));
        }

        Self::new(width, height, cells)
    }

    /// Read and parse a map file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Read`] if the file cannot be read, or any parse
    /// error from [`GridMap::parse`].
    pub fn load(path: &Path) -> Result<Self, GridError> {
        let contents = std::fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the coordinate lies inside the map.
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Classification of a cell, or `None` outside the map.
    pub fn kind(&self, coord: CellCoord) -> Option<CellKind> {
        if !self.contains(coord) {
            return None;
        }
        Some(self.cells[(coord.y * self.width + coord.x) as usize])
    }

    /// Whether the cell is a wall. Cells outside the map are not walls.
    pub fn is_wall(&self, coord: CellCoord) -> bool {
        self.kind(coord).is_some_and(CellKind::is_wall)
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, &kind)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), kind)
        })
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_wall()).count()
    }

    /// Centre of the whole map on the ground plane.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

fn parse_int(line: usize, content: &str) -> Result<i64, GridError> {
    content.parse().map_err(|_| GridError::InvalidNumber {
        line,
        content: content.to_string(),
    })
}

fn parse_dimension(entry: Option<(usize, &str)>, name: &'static str) -> Result<u32, GridError> {
    let (line, content) = entry.ok_or(GridError::MissingHeader(name))?;
    let value = parse_int(line, content)?;
    u32::try_from(value).map_err(|_| GridError::InvalidNumber {
        line,
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAP: &str = "3\n2\n0\n1\n4\n2\n3\n0\n";

    #[test]
    fn test_parse_reads_row_major_x_fastest() {
        let map = GridMap::parse(SMALL_MAP).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        assert_eq!(map.kind(CellCoord::new(0, 0)), Some(CellKind::Wall));
        assert_eq!(map.kind(CellCoord::new(1, 0)), Some(CellKind::Object(1)));
        assert_eq!(map.kind(CellCoord::new(2, 0)), Some(CellKind::Floor));
        assert_eq!(map.kind(CellCoord::new(0, 1)), Some(CellKind::Object(2)));
        assert_eq!(map.kind(CellCoord::new(1, 1)), Some(CellKind::Object(3)));
        assert_eq!(map.kind(CellCoord::new(2, 1)), Some(CellKind::Wall));
        assert_eq!(map.wall_count(), 2);
    }

    #[test]
    fn test_unknown_values_are_floor() {
        assert_eq!(CellKind::from_value(7), CellKind::Floor);
        assert_eq!(CellKind::from_value(-1), CellKind::Floor);
        assert_eq!(CellKind::from_value(4), CellKind::Floor);
    }

    #[test]
    fn test_outside_cells_are_not_walls() {
        let map = GridMap::parse(SMALL_MAP).unwrap();
        assert_eq!(map.kind(CellCoord::new(3, 0)), None);
        assert!(!map.is_wall(CellCoord::new(3, 0)));
    }

    #[test]
    fn test_trailing_blank_lines_and_crlf_are_accepted() {
        let map = GridMap::parse("1\r\n2\r\n0\r\n5\r\n\r\n\n").unwrap();
        assert_eq!(map.height(), 2);
        assert!(map.is_wall(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_non_numeric_line_reports_line_number() {
        let err = GridMap::parse("2\n1\n0\nwall\n").unwrap_err();
        match err {
            GridError::InvalidNumber { line, content } => {
                assert_eq!(line, 4);
                assert_eq!(content, "wall");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_header_is_rejected() {
        assert!(matches!(
            GridMap::parse("4\n"),
            Err(GridError::MissingHeader("height"))
        ));
        assert!(matches!(
            GridMap::parse(""),
            Err(GridError::MissingHeader("width"))
        ));
    }

    #[test]
    fn test_cell_count_mismatch_is_rejected() {
        assert!(matches!(
            GridMap::parse("2\n2\n0\n0\n0\n"),
            Err(GridError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_dimensions_are_validated() {
        assert!(matches!(
            GridMap::open(0, 3),
            Err(GridError::EmptyMap { .. })
        ));
        assert!(matches!(
            GridMap::open(1001, 1),
            Err(GridError::TooLarge(1001))
        ));
        assert!(GridMap::open(1000, 1).is_ok());
    }

    #[test]
    fn test_cells_iterates_every_cell_with_coords() {
        let map = GridMap::parse(SMALL_MAP).unwrap();
        let cells: Vec<_> = map.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[4], (CellCoord::new(1, 1), CellKind::Object(3)));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridMap::load(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, GridError::Read { .. }));
    }

    #[test]
    fn test_load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        std::fs::write(&path, SMALL_MAP).unwrap();
        let map = GridMap::load(&path).unwrap();
        assert_eq!(map, GridMap::parse(SMALL_MAP).unwrap());
        assert_eq!(map.center(), Vec2::new(1.5, 1.0));
    }
}
