//! Check-in export columns and row parsing.

use vsafe_cache::{CheckinReport, SymptomSeverities};
use vsafe_csv::{CsvHeader, field_at};
use vsafe_date::CalendarDate;

use super::error::{ReportError, Result};
use super::labels;

pub const REGISTRANT_CODE: &str = "REGISTRANT_CODE";
pub const HEALTHCARE_VISITS: &str = "HEALTHCARE_VISITS";

/// A named column and where it sits in the current file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub index: usize,
}

impl Column {
    /// Resolve `name`, failing when the header lacks it.
    pub fn required(header: &CsvHeader, name: &'static str) -> Result<Self> {
        Ok(Self {
            name,
            index: header.lookup(name)?,
        })
    }

    /// Resolve `name`, falling back to its usual position in the export.
    pub fn or_position(header: &CsvHeader, name: &'static str, position: usize) -> Self {
        Self {
            name,
            index: header.lookup_or(name, position),
        }
    }

    pub fn get<'a>(&self, row: &'a [String]) -> &'a str {
        field_at(row, self.index)
    }
}

/// Every column a [`CheckinReport`] is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinColumns {
    pub registrant: Column,
    pub date: Column,
    pub abdominal_pain: Column,
    pub chills: Column,
    pub diarrhea: Column,
    pub fatigue: Column,
    pub feeling_today: Column,
    pub fever: Column,
    pub had_symptoms: Column,
    pub headache: Column,
    pub health_impact: Column,
    pub health_now: Column,
    pub health_now_comparison: Column,
    pub vaccine_caused_health_issues: Column,
    pub healthcare_visits: Column,
    pub itching: Column,
    pub joint_pains: Column,
    pub muscle_or_body_aches: Column,
    pub nausea: Column,
    pub pain: Column,
    pub pregnant: Column,
    pub pregnancy_test: Column,
    pub rash_outside_injection_site: Column,
    pub redness: Column,
    pub site_reaction: Column,
    pub swelling: Column,
    pub systemic_reaction: Column,
    pub tested_positive: Column,
    pub tested_positive_date: Column,
    pub vomiting: Column,
}

impl CheckinColumns {
    /// `REGISTRANT_CODE` and `HEALTHCARE_VISITS` must be present; other
    /// columns fall back to their position in the consolidated export.
    pub fn resolve(header: &CsvHeader) -> Result<Self> {
        let at = |name: &'static str, position: usize| Column::or_position(header, name, position);
        Ok(Self {
            registrant: Column::required(header, REGISTRANT_CODE)?,
            date: at("SURVEY_START_DATE", 3),
            abdominal_pain: at("ABDOMINAL_PAIN", 6),
            chills: at("CHILLS", 7),
            diarrhea: at("DIARRHEA", 8),
            fatigue: at("FATIGUE", 9),
            feeling_today: at("FEELING_TODAY", 10),
            fever: at("FEVER", 11),
            had_symptoms: at("HAD_SYMPTOMS", 12),
            headache: at("HEADACHE", 13),
            health_impact: at("HEALTH_IMPACT", 14),
            health_now: at("HEALTH_NOW", 15),
            health_now_comparison: at("HEALTH_NOW_COMPARISON", 16),
            vaccine_caused_health_issues: at("VACCINE_CAUSED_HEALTH_ISSUES", 17),
            healthcare_visits: Column::required(header, HEALTHCARE_VISITS)?,
            itching: at("ITCHING", 19),
            joint_pains: at("JOINT_PAINS", 20),
            muscle_or_body_aches: at("MUSCLE_OR_BODY_ACHES", 21),
            nausea: at("NAUSEA", 22),
            pain: at("PAIN", 23),
            pregnant: at("PREGNANT", 24),
            pregnancy_test: at("PREGNANCY_TEST", 25),
            rash_outside_injection_site: at("RASH_OUTSIDE_INJECTION_SITE", 26),
            redness: at("REDNESS", 27),
            site_reaction: at("SITE_REACTION", 28),
            swelling: at("SWELLING", 29),
            systemic_reaction: at("SYSTEMIC_REACTION", 30),
            tested_positive: at("TESTED_POSITIVE", 34),
            tested_positive_date: at("TESTED_POSITIVE_DATE", 35),
            vomiting: at("VOMITING", 36),
        })
    }

    /// Build a report from one check-in row.
    ///
    /// Symptom and rating columns must hold a known answer (blank included);
    /// yes/no and pregnancy answers default when unrecognized.
    pub fn parse(&self, row: &[String]) -> Result<CheckinReport> {
        let severity = |column: Column| labels::severity(column.name, column.get(row));
        let yes = |column: Column| labels::yes_no(column.get(row));

        let symptoms = SymptomSeverities {
            abdominal_pain: severity(self.abdominal_pain)?,
            chills: severity(self.chills)?,
            diarrhea: severity(self.diarrhea)?,
            fatigue: severity(self.fatigue)?,
            headache: severity(self.headache)?,
            itching: severity(self.itching)?,
            joint_pains: severity(self.joint_pains)?,
            muscle_or_body_aches: severity(self.muscle_or_body_aches)?,
            nausea: severity(self.nausea)?,
            pain: severity(self.pain)?,
            rash_outside_injection_site: severity(self.rash_outside_injection_site)?,
            redness: severity(self.redness)?,
            swelling: severity(self.swelling)?,
            vomiting: severity(self.vomiting)?,
        };

        let positive_date = self.tested_positive_date.get(row);
        let tested_positive_date = if positive_date.is_empty() {
            None
        } else {
            Some(parse_date(self.tested_positive_date.name, positive_date)?)
        };

        Ok(CheckinReport {
            date: parse_date(self.date.name, self.date.get(row))?,
            symptoms,
            feeling_today: labels::feeling(self.feeling_today.name, self.feeling_today.get(row))?,
            fever: yes(self.fever),
            had_symptoms: yes(self.had_symptoms),
            health_impact: labels::health_impact(
                self.health_impact.name,
                self.health_impact.get(row),
            )?,
            health_now: labels::health_now(self.health_now.name, self.health_now.get(row))?,
            health_now_comparison: labels::health_change(
                self.health_now_comparison.name,
                self.health_now_comparison.get(row),
            )?,
            vaccine_caused_health_issues: yes(self.vaccine_caused_health_issues),
            healthcare_visits: labels::healthcare_visits(
                self.healthcare_visits.name,
                self.healthcare_visits.get(row),
            )?,
            pregnant: labels::pregnancy(self.pregnant.get(row)),
            pregnancy_test: yes(self.pregnancy_test),
            site_reaction: labels::site_reaction(
                self.site_reaction.name,
                self.site_reaction.get(row),
            )?,
            systemic_reaction: labels::systemic_reaction(
                self.systemic_reaction.name,
                self.systemic_reaction.get(row),
            )?,
            tested_positive: yes(self.tested_positive),
            tested_positive_date,
        })
    }
}

pub fn parse_date(column: &'static str, value: &str) -> Result<CalendarDate> {
    CalendarDate::parse(value).map_err(|source| ReportError::InvalidDate { column, source })
}
