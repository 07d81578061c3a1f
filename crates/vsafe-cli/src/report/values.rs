//! Distinct answers per column, for learning what an export contains.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};
use vsafe_csv::{CsvReader, field_at};

use super::error::Result;
use super::for_each_row;
use super::labels::OPTION_SEPARATOR;

/// Multi-select columns whose answers are split into options.
pub const MULTI_SELECT_COLUMNS: [&str; 4] = [
    "HEALTH_IMPACT",
    "HEALTHCARE_VISITS",
    "SITE_REACTION",
    "SYSTEMIC_REACTION",
];

#[derive(Debug, Clone)]
pub struct ValueScanOptions {
    /// Leading columns (identifiers, dates) to leave out.
    pub skip_columns: usize,
    /// Stop tracking a column once it has more distinct values than this.
    pub max_values: usize,
    /// Columns whose answers are `:`-separated option lists.
    pub split_columns: Vec<String>,
}

impl Default for ValueScanOptions {
    fn default() -> Self {
        Self {
            skip_columns: 6,
            max_values: 1000,
            split_columns: MULTI_SELECT_COLUMNS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValues {
    pub index: usize,
    pub name: String,
    /// `None` once the column exceeded the value cap.
    pub values: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueScan {
    pub rows: u64,
    pub columns: Vec<ColumnValues>,
}

struct Tracked {
    column: ColumnValues,
    split: bool,
}

impl Tracked {
    fn add(&mut self, value: &str, max_values: usize) {
        let Some(values) = self.column.values.as_mut() else {
            return;
        };
        if self.split {
            for option in value.split(OPTION_SEPARATOR) {
                insert_new(values, option);
            }
        } else {
            insert_new(values, value);
        }
        if values.len() > max_values {
            debug!(column = %self.column.name, "too many distinct values; no longer tracked");
            self.column.values = None;
        }
    }
}

fn insert_new(values: &mut BTreeSet<String>, value: &str) {
    if !values.contains(value) {
        values.insert(value.to_string());
    }
}

/// Collect the distinct values of every column after `skip_columns`.
pub fn scan_values<R: Read>(
    reader: &mut CsvReader<R>,
    source: &Path,
    options: &ValueScanOptions,
) -> Result<ValueScan> {
    let header = reader.read_header()?;
    let mut tracked: Vec<Tracked> = header
        .columns()
        .iter()
        .enumerate()
        .skip(options.skip_columns)
        .map(|(index, name)| Tracked {
            split: options
                .split_columns
                .iter()
                .any(|split| split.eq_ignore_ascii_case(name)),
            column: ColumnValues {
                index,
                name: name.clone(),
                values: Some(BTreeSet::new()),
            },
        })
        .collect();

    let rows = for_each_row(reader, source, |row| {
        for column in &mut tracked {
            column.add(field_at(row, column.column.index), options.max_values);
        }
        Ok(())
    })?;
    info!(rows, columns = tracked.len(), "scanned distinct values");

    Ok(ValueScan {
        rows,
        columns: tracked.into_iter().map(|t| t.column).collect(),
    })
}
