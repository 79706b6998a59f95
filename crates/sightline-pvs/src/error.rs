//! Visibility file error types.

use std::path::PathBuf;

/// Errors raised while reading or writing a visibility file.
#[derive(Debug, thiserror::Error)]
pub enum PvsError {
    /// The file could not be opened or read.
    #[error("failed to read visibility file {}: {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be created or written.
    #[error("failed to write visibility file {}: {source}", path.display())]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A stream-level I/O failure outside of a named file.
    #[error("visibility I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cell id was not a valid unsigned integer.
    #[error("line {line}: invalid cell id {content:?}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        content: String,
    },

    /// A cell id line was not followed by its list of visible cells.
    #[error("line {line}: cell {cell} has no visible-cell list")]
    MissingValues {
        /// 1-based line number of the cell id.
        line: usize,
        /// The dangling cell id.
        cell: u32,
    },

    /// A precompute worker thread could not be started.
    #[error("failed to spawn visibility worker: {0}")]
    Spawn(#[source] std::io::Error),
}
