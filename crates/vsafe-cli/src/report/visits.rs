//! Per-subject health-care visit tallies.

use std::io::Read;
use std::path::Path;

use tracing::{info, trace, warn};
use vsafe_cache::{CacheMap, HealthcareVisits, VisitTally};
use vsafe_csv::CsvReader;

use super::checkin::{Column, HEALTHCARE_VISITS, REGISTRANT_CODE};
use super::error::Result;
use super::{for_each_row, labels};
use crate::logging::redact_value;

/// Count, for every subject, the check-ins reporting each kind of visit.
///
/// Every subject seen gets an entry, including those who never reported a
/// visit. Rows too short to hold the subject identifier are skipped.
pub fn tally_visits<R: Read>(
    reader: &mut CsvReader<R>,
    source: &Path,
) -> Result<CacheMap<VisitTally>> {
    let header = reader.read_header()?;
    let registrant = Column::required(&header, REGISTRANT_CODE)?;
    let visits = Column::required(&header, HEALTHCARE_VISITS)?;

    let mut tallies: CacheMap<VisitTally> = CacheMap::new();
    let mut skipped = 0u64;
    let rows = for_each_row(reader, source, |row| {
        let Some(code) = row.get(registrant.index) else {
            skipped += 1;
            return Ok(());
        };
        let kinds = labels::healthcare_visits(visits.name, visits.get(row))?;
        if !kinds.is_empty() {
            trace!(subject = redact_value(code), visits = kinds.bits(), "visit");
        }
        tallies
            .entry(code.clone())
            .or_default()
            .record(kinds);
        Ok(())
    })?;

    if skipped > 0 {
        warn!(skipped, "skipped rows without a {REGISTRANT_CODE} field");
    }
    info!(rows, subjects = tallies.len(), "tallied health-care visits");
    Ok(tallies)
}

/// Number of subjects who reported each kind of visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitCounts {
    pub any: usize,
    pub er: usize,
    pub hospital: usize,
    pub outpatient: usize,
    pub telehealth: usize,
}

impl VisitCounts {
    /// Count one subject who reported `kinds`.
    pub fn add(&mut self, kinds: HealthcareVisits) {
        if kinds.is_empty() {
            return;
        }
        self.any += 1;
        for (flag, count) in [
            (HealthcareVisits::ER, &mut self.er),
            (HealthcareVisits::HOSPITAL, &mut self.hospital),
            (HealthcareVisits::OUTPATIENT, &mut self.outpatient),
            (HealthcareVisits::TELEHEALTH, &mut self.telehealth),
        ] {
            if kinds.contains(flag) {
                *count += 1;
            }
        }
    }
}

/// Visit counts over a population of subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitSummary {
    pub title: &'static str,
    /// Subjects in the whole export; the denominator for percentages.
    pub total_subjects: usize,
    pub counts: VisitCounts,
}

impl VisitSummary {
    /// Subjects who reported each kind of visit at least once.
    pub fn from_tallies(tallies: &CacheMap<VisitTally>) -> Self {
        let mut counts = VisitCounts::default();
        for tally in tallies.values() {
            counts.add(tally.kinds());
        }
        Self {
            title: "Health care interactions",
            total_subjects: tallies.len(),
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(rows: &str) -> CacheMap<VisitTally> {
        let text = format!("REGISTRANT_CODE,HEALTHCARE_VISITS\n{rows}");
        tally_visits(&mut CsvReader::new(text.as_bytes()), Path::new("checkin.csv")).unwrap()
    }

    #[test]
    fn test_tally_visits() {
        let tallies = tally(
            "R1,Hospitalization\n\
             R1,\"Hospitalization:Emergency room or emergency department visit\"\n\
             R2,None\n\
             R3\n",
        );
        assert_eq!(tallies.len(), 3);
        assert_eq!(tallies["R1"].hospital, 2);
        assert_eq!(tallies["R1"].er, 1);
        assert!(!tallies["R2"].has_visit());
        assert!(!tallies["R3"].has_visit());
    }

    #[test]
    fn test_skips_rows_without_registrant() {
        let text = "HEALTHCARE_VISITS,REGISTRANT_CODE\nHospitalization\nNone,R1\n";
        let tallies =
            tally_visits(&mut CsvReader::new(text.as_bytes()), Path::new("checkin.csv")).unwrap();
        assert_eq!(tallies.len(), 1);
        assert!(tallies.contains_key("R1"));
    }

    #[test]
    fn test_unknown_visit_reports_row() {
        let text = "REGISTRANT_CODE,HEALTHCARE_VISITS\nR1,None\nR2,House call\n";
        let err = tally_visits(&mut CsvReader::new(text.as_bytes()), Path::new("checkin.csv"))
            .unwrap_err();
        assert_eq!(err.to_string(), "checkin.csv, row 2");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(
            source.to_string(),
            "unknown value 'House call' in column HEALTHCARE_VISITS"
        );
    }

    #[test]
    fn test_summary() {
        let summary = VisitSummary::from_tallies(&tally(
            "R1,Hospitalization\n\
             R2,\"Telehealth, virtual health, or email health consultation\"\n\
             R2,Hospitalization\n\
             R3,\n",
        ));
        assert_eq!(summary.total_subjects, 3);
        assert_eq!(
            summary.counts,
            VisitCounts {
                any: 2,
                er: 0,
                hospital: 2,
                outpatient: 0,
                telehealth: 1,
            }
        );
    }
}
