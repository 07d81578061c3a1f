//! Aggregations over the check-in and vaccination exports.

use std::io::Read;
use std::path::Path;

use tracing::info;
use vsafe_cache::{CacheMap, RecordCache, SubjectHistory, VisitTally};
use vsafe_csv::CsvReader;

pub mod checkin;
mod error;
pub mod history;
pub mod labels;
pub mod values;
pub mod visits;

pub use error::{ReportError, Result};

use history::{build_histories, summarize_histories};
use visits::{VisitSummary, tally_visits};

/// Pass each data row (after the header) to `visit`.
///
/// Errors from `visit` are tagged with `source` and the 1-based data row.
/// Returns the number of data rows read.
fn for_each_row<R: Read>(
    reader: &mut CsvReader<R>,
    source: &Path,
    mut visit: impl FnMut(&[String]) -> Result<()>,
) -> Result<u64> {
    while let Some(row) = reader.read_record()? {
        let data_row = reader.records_read() - 1;
        visit(&row).map_err(|e| e.at_row(source, data_row))?;
    }
    Ok(reader.records_read().saturating_sub(1))
}

/// Visit tallies from `cache`, scanning `checkin` only when no cache exists.
///
/// `open` turns a path into a reader, so callers can attach progress output.
pub fn load_visit_tallies<R, O>(
    cache: &mut RecordCache,
    checkin: &Path,
    open: O,
) -> Result<CacheMap<VisitTally>>
where
    R: Read,
    O: FnOnce(&Path) -> vsafe_csv::Result<CsvReader<R>>,
{
    cache.load_or_compute(|| {
        let mut reader = open(checkin)?;
        tally_visits(&mut reader, checkin)
    })
}

/// Summary of visits reported on or after the first vaccine-blamed check-in.
///
/// Subject histories come from `history_cache`, built from both exports when
/// absent. Percentages are relative to every subject in `tallies`.
pub fn vaccine_issue_summary<R, O>(
    history_cache: &mut RecordCache,
    tallies: &CacheMap<VisitTally>,
    checkin: &Path,
    vaccinations: &Path,
    open: O,
) -> Result<VisitSummary>
where
    R: Read,
    O: Fn(&Path) -> vsafe_csv::Result<CsvReader<R>>,
{
    let histories: CacheMap<SubjectHistory> = history_cache.load_or_compute(|| {
        let mut checkins = open(checkin)?;
        let mut doses = open(vaccinations)?;
        build_histories(tallies, &mut checkins, checkin, &mut doses, vaccinations)
    })?;
    info!(subjects = histories.len(), "subject histories ready");
    Ok(summarize_histories(&histories, tallies.len()))
}
