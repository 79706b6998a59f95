//! The [`PvsTable`] and its text serialization.
//!
//! ## Visibility file format
//!
//! ```text
//! # header comment
//! <cell id>
//! <visible id>,<visible id>,...,
//! <cell id>
//! <visible id>,...,
//! ```
//!
//! The first line is always treated as a header and skipped. Each cell id
//! line is followed by a comma-terminated list of the ids visible from it.
//! Cells that do not appear have an empty visible set.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use sightline_grid::CellId;

use crate::error::PvsError;

/// Set of cells visible from one cell.
pub type CellSet = FxHashSet<CellId>;

/// Mapping from a cell to the set of cells visible from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PvsTable {
    sets: FxHashMap<CellId, CellSet>,
}

impl PvsTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `to` as visible from `from`.
    pub fn insert(&mut self, from: CellId, to: CellId) {
        self.sets.entry(from).or_default().insert(to);
    }

    /// The cells visible from `from`, or `None` if the cell has no entry.
    pub fn visible_from(&self, from: CellId) -> Option<&CellSet> {
        self.sets.get(&from)
    }

    /// Whether `to` is recorded as visible from `from`.
    pub fn is_visible(&self, from: CellId, to: CellId) -> bool {
        self.sets.get(&from).is_some_and(|set| set.contains(&to))
    }

    /// Union another table into this one.
    pub fn merge(&mut self, other: PvsTable) {
        if self.sets.is_empty() {
            self.sets = other.sets;
            return;
        }
        for (from, set) in other.sets {
            self.sets.entry(from).or_default().extend(set);
        }
    }

    /// Number of cells with a non-empty visible set.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total number of (from, to) pairs across all sets.
    pub fn total_pairs(&self) -> usize {
        self.sets.values().map(|set| set.len()).sum()
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &CellSet)> {
        self.sets.iter().map(|(&id, set)| (id, set))
    }

    /// Write the table in the visibility file format.
    ///
    /// Keys and values are written in ascending order so the output is
    /// stable for a given table. `header` is written after a `# ` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PvsError::Io`] if the writer fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, header: &str) -> Result<(), PvsError> {
        writeln!(writer, "# {header}")?;

        let mut keys: Vec<CellId> = self
            .sets
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(&id, _)| id)
            .collect();
        keys.sort_unstable();

        let mut values = Vec::new();
        for key in keys {
            writeln!(writer, "{key}")?;
            values.clear();
            values.extend(self.sets[&key].iter().copied());
            values.sort_unstable();
            for value in &values {
                write!(writer, "{value},")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the table to a file, replacing any existing contents.
    ///
    /// # Errors
    ///
    /// Returns [`PvsError::Write`] if the file cannot be created or written.
    pub fn save(&self, path: &Path, header: &str) -> Result<(), PvsError> {
        let wrap = |source| PvsError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, header).map_err(|e| match e {
            PvsError::Io(source) => wrap(source),
            other => other,
        })?;
        writer.flush().map_err(wrap)
    }

    /// Parse a table from the visibility file format.
    ///
    /// # Errors
    ///
    /// Returns [`PvsError::Parse`] for a non-numeric id and
    /// [`PvsError::MissingValues`] for a cell line at the end of input.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, PvsError> {
        let mut table = Self::new();
        let mut lines = reader
            .lines()
            .enumerate()
            .skip(1)
            .map(|(index, line)| line.map(|l| (index + 1, l)));

        while let Some(entry) = lines.next() {
            let (line, content) = entry?;
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            let cell = parse_id(line, content)?;

            let Some(values) = lines.next() else {
                return Err(PvsError::MissingValues {
                    line,
                    cell: cell.value(),
                });
            };
            let (values_line, values) = values?;

            let set = table.sets.entry(cell).or_default();
            for token in values.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                set.insert(parse_id(values_line, token)?);
            }
        }

        // Empty lists carry no information; drop them so `len` only counts
        // cells that actually see something.
        table.sets.retain(|_, set| !set.is_empty());
        Ok(table)
    }

    /// Load a table from a visibility file.
    ///
    /// # Errors
    ///
    /// Returns [`PvsError::Read`] if the file cannot be opened or read, or
    /// any parse error from [`PvsTable::read_from`].
    pub fn load(path: &Path) -> Result<Self, PvsError> {
        let wrap = |source| PvsError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(wrap)?;
        Self::read_from(BufReader::new(file)).map_err(|e| match e {
            PvsError::Io(source) => wrap(source),
            other => other,
        })
    }
}

impl FromIterator<(CellId, CellId)> for PvsTable {
    fn from_iter<I: IntoIterator<Item = (CellId, CellId)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, to) in iter {
            table.insert(from, to);
        }
        table
    }
}

fn parse_id(line: usize, token: &str) -> Result<CellId, PvsError> {
    token.parse().map(CellId).map_err(|_| PvsError::Parse {
        line,
        content: token.to_string(),
    })
}
