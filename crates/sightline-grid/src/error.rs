//! Grid loading error types.

use std::path::PathBuf;

/// Errors that can occur when loading or parsing a grid map.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The map file could not be read.
    #[error("failed to read map {}: {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The width or height header line is missing.
    #[error("map header is missing the {0} line")]
    MissingHeader(&'static str),

    /// A line did not hold a single integer.
    #[error("line {line}: expected an integer, found {content:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// Width or height is zero.
    #[error("map dimensions must be non-zero (got {width}x{height})")]
    EmptyMap {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// A dimension exceeds what a packed cell id can address.
    #[error("map dimension {0} exceeds the supported maximum of {max}", max = crate::MAX_GRID_DIMENSION)]
    TooLarge(u32),

    /// The number of cell lines does not match `width * height`.
    #[error("expected {expected} cell values, found {actual}")]
    CellCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Number of cell lines actually present.
        actual: usize,
    },
}
