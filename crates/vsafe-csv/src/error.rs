//! Error types for CSV reading and writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing CSV records.
///
/// Malformed quoting is never an error; only I/O failures and header lookups
/// can fail.
#[derive(Debug, Error)]
pub enum CsvError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or create a file.
    #[error("failed to {operation} file {path}: {source}")]
    File {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Header Errors ===
    /// Stream ended before a header row was read.
    #[error("input has no header row")]
    MissingHeader,

    /// Column name not present in the header row.
    #[error("column '{column}' not found in header")]
    ColumnNotFound { column: String },
}

/// Result type for CSV operations.
pub type Result<T> = std::result::Result<T, CsvError>;

impl CsvError {
    /// Create a ColumnNotFound error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// True for failures of the underlying stream or file system.
    pub fn is_stream_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::File { .. } | Self::Io(_)
        )
    }

    /// True when a requested column is absent from the header.
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::ColumnNotFound { .. } | Self::MissingHeader)
    }
}
