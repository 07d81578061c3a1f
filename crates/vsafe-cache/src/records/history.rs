//! Per-subject chronological log.

use std::io::{Read, Write};

use super::checkin::CheckinReport;
use super::codes::HealthcareVisits;
use super::dose::VaccineDose;
use crate::codec::{BinaryRecord, Decoder, Encoder};
use crate::error::Result;

/// Every check-in and dose recorded for one subject.
///
/// Stored as `[version][report count][reports][dose count][doses]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubjectHistory {
    pub reports: Vec<CheckinReport>,
    pub doses: Vec<VaccineDose>,
}

impl SubjectHistory {
    /// Order reports and doses by date. Same-day entries keep their input order.
    pub fn sort_chronologically(&mut self) {
        self.reports.sort_by_key(|report| report.date);
        self.doses.sort_by_key(|dose| dose.date);
    }

    /// Visits reported from the first check-in that blamed the vaccine onward.
    ///
    /// Visits before that check-in are not counted. Once set, the flag stays set
    /// for every later check-in; this differs from counting only check-ins that
    /// blame the vaccine themselves. Reports must already be in chronological
    /// order.
    pub fn visits_after_vaccine_issue(&self) -> HealthcareVisits {
        self.reports
            .iter()
            .skip_while(|report| !report.vaccine_caused_health_issues)
            .fold(HealthcareVisits::EMPTY, |visits, report| {
                visits | report.healthcare_visits
            })
    }
}

impl BinaryRecord for SubjectHistory {
    const NAME: &'static str = "subject history";
    const VERSION: u8 = 1;

    fn encode_fields<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        encoder.write_records(&self.reports)?;
        encoder.write_records(&self.doses)
    }

    fn decode_fields<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        let reports = decoder.read_records()?;
        let doses = decoder.read_records()?;
        Ok(Self { reports, doses })
    }
}

#[cfg(test)]
mod tests {
    use vsafe_date::CalendarDate;

    use super::*;

    fn report(date: &str, flagged: bool, visits: HealthcareVisits) -> CheckinReport {
        let mut report = CheckinReport::blank(CalendarDate::parse(date).unwrap());
        report.vaccine_caused_health_issues = flagged;
        report.healthcare_visits = visits;
        report
    }

    #[test]
    fn test_sort_chronologically_is_stable() {
        let mut history = SubjectHistory {
            reports: vec![
                report("3/1/2021", false, HealthcareVisits::ER),
                report("1/1/2021", false, HealthcareVisits::EMPTY),
                report("3/1/2021", true, HealthcareVisits::HOSPITAL),
            ],
            doses: vec![
                VaccineDose {
                    date: CalendarDate::parse("2/1/2021").unwrap(),
                    dose_number: 2,
                },
                VaccineDose {
                    date: CalendarDate::parse("1/1/2021").unwrap(),
                    dose_number: 1,
                },
            ],
        };
        history.sort_chronologically();

        assert_eq!(history.reports[0].date.to_string(), "1/1/2021");
        assert_eq!(history.reports[1].healthcare_visits, HealthcareVisits::ER);
        assert_eq!(history.reports[2].healthcare_visits, HealthcareVisits::HOSPITAL);
        assert_eq!(history.doses[0].dose_number, 1);
    }

    #[test]
    fn test_visits_after_vaccine_issue() {
        let history = SubjectHistory {
            reports: vec![
                report("1/1/2021", false, HealthcareVisits::ER),
                report("1/2/2021", true, HealthcareVisits::EMPTY),
                report("1/3/2021", false, HealthcareVisits::TELEHEALTH),
                report("1/4/2021", true, HealthcareVisits::OUTPATIENT),
            ],
            doses: Vec::new(),
        };
        assert_eq!(
            history.visits_after_vaccine_issue(),
            HealthcareVisits::TELEHEALTH | HealthcareVisits::OUTPATIENT
        );
    }

    #[test]
    fn test_no_flag_means_no_visits() {
        let history = SubjectHistory {
            reports: vec![report("1/1/2021", false, HealthcareVisits::ALL)],
            doses: Vec::new(),
        };
        assert!(history.visits_after_vaccine_issue().is_empty());
    }
}
