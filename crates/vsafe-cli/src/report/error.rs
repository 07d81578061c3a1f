//! Report errors.

use std::path::PathBuf;

use thiserror::Error;
use vsafe_cache::CacheError;
use vsafe_csv::CsvError;
use vsafe_date::DateError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// An answer outside the known option list.
    #[error("unknown value '{value}' in column {column}")]
    UnknownValue { column: &'static str, value: String },

    #[error("invalid number '{value}' in column {column}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("invalid date in column {column}")]
    InvalidDate {
        column: &'static str,
        #[source]
        source: DateError,
    },

    /// Wraps a row-level error with its location.
    #[error("{path}, row {row}")]
    Row {
        path: PathBuf,
        row: u64,
        #[source]
        source: Box<ReportError>,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub fn unknown_value(column: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            column,
            value: value.to_string(),
        }
    }

    /// Attach the file and 1-based data row number.
    pub fn at_row(self, path: impl Into<PathBuf>, row: u64) -> Self {
        Self::Row {
            path: path.into(),
            row,
            source: Box::new(self),
        }
    }
}
