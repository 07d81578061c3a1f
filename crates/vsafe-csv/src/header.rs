//! Header row and column lookup.

use crate::error::{CsvError, Result};

/// Column names from the first record of a file.
///
/// Column order differs between exports, so callers resolve every column by
/// name once and then index rows directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvHeader {
    columns: Vec<String>,
}

impl CsvHeader {
    /// Creates a header from a parsed record.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the first column whose name matches, ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| CsvError::column_not_found(name))
    }

    /// Like [`lookup`](Self::lookup) but falls back to `default`.
    pub fn lookup_or(&self, name: &str, default: usize) -> usize {
        self.position(name).unwrap_or(default)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

impl From<Vec<String>> for CsvHeader {
    fn from(columns: Vec<String>) -> Self {
        Self::new(columns)
    }
}

/// Field `index` of `record`, or `""` when the record is short.
///
/// Exports routinely drop empty trailing columns, so a short record is not an
/// error.
pub fn field_at(record: &[String], index: usize) -> &str {
    record.get(index).map_or("", String::as_str)
}
