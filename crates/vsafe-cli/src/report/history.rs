//! Chronological logs for subjects who reported any health-care visit.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};
use vsafe_cache::{CacheMap, SubjectHistory, VaccineDose, VisitTally};
use vsafe_csv::{CsvHeader, CsvReader};

use super::checkin::{CheckinColumns, Column, REGISTRANT_CODE, parse_date};
use super::error::{ReportError, Result};
use super::for_each_row;
use super::visits::{VisitCounts, VisitSummary};

/// Vaccination export columns, resolved by name with positional fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationColumns {
    pub registrant: Column,
    pub dose_number: Column,
    pub date: Column,
}

impl VaccinationColumns {
    pub fn resolve(header: &CsvHeader) -> Self {
        Self {
            registrant: Column::or_position(header, REGISTRANT_CODE, 0),
            dose_number: Column::or_position(header, "DOSE_NUMBER", 2),
            date: Column::or_position(header, "VACCINATION_DATE", 3),
        }
    }

    pub fn parse(&self, row: &[String]) -> Result<VaccineDose> {
        let dose = self.dose_number.get(row);
        let dose_number = dose.trim().parse::<u8>().map_err(|_| ReportError::InvalidNumber {
            column: self.dose_number.name,
            value: dose.to_string(),
        })?;
        Ok(VaccineDose {
            date: parse_date(self.date.name, self.date.get(row))?,
            dose_number,
        })
    }
}

/// Start an empty history for every subject with at least one visit.
pub fn subjects_with_visits(tallies: &CacheMap<VisitTally>) -> CacheMap<SubjectHistory> {
    tallies
        .iter()
        .filter(|(_, tally)| tally.has_visit())
        .map(|(code, _)| (code.clone(), SubjectHistory::default()))
        .collect()
}

/// Append every check-in belonging to a subject in `histories`.
pub fn collect_checkins<R: Read>(
    histories: &mut CacheMap<SubjectHistory>,
    reader: &mut CsvReader<R>,
    source: &Path,
) -> Result<()> {
    let header = reader.read_header()?;
    let columns = CheckinColumns::resolve(&header)?;
    let mut kept = 0usize;
    let rows = for_each_row(reader, source, |row| {
        let Some(history) = row
            .get(columns.registrant.index)
            .and_then(|code| histories.get_mut(code))
        else {
            return Ok(());
        };
        history.reports.push(columns.parse(row)?);
        kept += 1;
        Ok(())
    })?;
    info!(rows, kept, "collected check-ins");
    Ok(())
}

/// Append every dose belonging to a subject in `histories`.
pub fn collect_doses<R: Read>(
    histories: &mut CacheMap<SubjectHistory>,
    reader: &mut CsvReader<R>,
    source: &Path,
) -> Result<()> {
    let header = reader.read_header()?;
    let columns = VaccinationColumns::resolve(&header);
    debug!(?columns, "resolved vaccination columns");
    let mut kept = 0usize;
    let rows = for_each_row(reader, source, |row| {
        let Some(history) = row
            .get(columns.registrant.index)
            .and_then(|code| histories.get_mut(code))
        else {
            return Ok(());
        };
        history.doses.push(columns.parse(row)?);
        kept += 1;
        Ok(())
    })?;
    info!(rows, kept, "collected vaccine doses");
    Ok(())
}

/// Build the full history map from both exports, sorted by date.
pub fn build_histories<C: Read, V: Read>(
    tallies: &CacheMap<VisitTally>,
    checkins: &mut CsvReader<C>,
    checkin_source: &Path,
    vaccinations: &mut CsvReader<V>,
    vaccination_source: &Path,
) -> Result<CacheMap<SubjectHistory>> {
    let mut histories = subjects_with_visits(tallies);
    info!(subjects = histories.len(), "subjects with a health-care visit");
    collect_checkins(&mut histories, checkins, checkin_source)?;
    collect_doses(&mut histories, vaccinations, vaccination_source)?;
    for history in histories.values_mut() {
        history.sort_chronologically();
    }
    Ok(histories)
}

/// Visits reported on or after a subject first blamed the vaccine.
///
/// Percentages use `total_subjects`, every subject in the check-in export.
pub fn summarize_histories(
    histories: &CacheMap<SubjectHistory>,
    total_subjects: usize,
) -> VisitSummary {
    let mut counts = VisitCounts::default();
    for history in histories.values() {
        counts.add(history.visits_after_vaccine_issue());
    }
    VisitSummary {
        title: "Health care interactions after vaccine flag set",
        total_subjects,
        counts,
    }
}
