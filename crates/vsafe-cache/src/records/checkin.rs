//! Compact form of one health check-in.

use std::io::{Read, Write};

use vsafe_date::CalendarDate;

use super::codes::{
    Feeling, HealthChange, HealthImpact, HealthNow, HealthcareVisits, PregnancyStatus, Severity,
    SiteReaction, SystemicReaction,
};
use crate::codec::{BinaryRecord, Decoder, Encoder};
use crate::error::Result;

/// Severity of each tracked symptom, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymptomSeverities {
    pub abdominal_pain: Severity,
    pub chills: Severity,
    pub diarrhea: Severity,
    pub fatigue: Severity,
    pub headache: Severity,
    pub itching: Severity,
    pub joint_pains: Severity,
    pub muscle_or_body_aches: Severity,
    pub nausea: Severity,
    pub pain: Severity,
    pub rash_outside_injection_site: Severity,
    pub redness: Severity,
    pub swelling: Severity,
    pub vomiting: Severity,
}

impl SymptomSeverities {
    fn in_order(&self) -> [Severity; 14] {
        [
            self.abdominal_pain,
            self.chills,
            self.diarrhea,
            self.fatigue,
            self.headache,
            self.itching,
            self.joint_pains,
            self.muscle_or_body_aches,
            self.nausea,
            self.pain,
            self.rash_outside_injection_site,
            self.redness,
            self.swelling,
            self.vomiting,
        ]
    }
}

/// One check-in, reduced to the answers the reports use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinReport {
    pub date: CalendarDate,
    pub symptoms: SymptomSeverities,
    pub feeling_today: Feeling,
    pub fever: bool,
    pub had_symptoms: bool,
    pub health_impact: HealthImpact,
    pub health_now: HealthNow,
    pub health_now_comparison: HealthChange,
    pub vaccine_caused_health_issues: bool,
    pub healthcare_visits: HealthcareVisits,
    pub pregnant: PregnancyStatus,
    pub pregnancy_test: bool,
    pub site_reaction: SiteReaction,
    pub systemic_reaction: SystemicReaction,
    pub tested_positive: bool,
    pub tested_positive_date: Option<CalendarDate>,
}

impl CheckinReport {
    /// A report for `date` with every answer blank.
    pub fn blank(date: CalendarDate) -> Self {
        Self {
            date,
            symptoms: SymptomSeverities::default(),
            feeling_today: Feeling::None,
            fever: false,
            had_symptoms: false,
            health_impact: HealthImpact::EMPTY,
            health_now: HealthNow::None,
            health_now_comparison: HealthChange::None,
            vaccine_caused_health_issues: false,
            healthcare_visits: HealthcareVisits::EMPTY,
            pregnant: PregnancyStatus::Unknown,
            pregnancy_test: false,
            site_reaction: SiteReaction::EMPTY,
            systemic_reaction: SystemicReaction::EMPTY,
            tested_positive: false,
            tested_positive_date: None,
        }
    }
}

impl BinaryRecord for CheckinReport {
    const NAME: &'static str = "check-in report";
    const VERSION: u8 = 1;

    fn encode_fields<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        encoder.write_date(self.date)?;
        for severity in self.symptoms.in_order() {
            encoder.write_u8(severity.code())?;
        }
        encoder.write_u8(self.feeling_today.code())?;
        encoder.write_bool(self.fever)?;
        encoder.write_bool(self.had_symptoms)?;
        encoder.write_u8(self.health_impact.bits())?;
        encoder.write_u8(self.health_now.code())?;
        encoder.write_u8(self.health_now_comparison.code())?;
        encoder.write_bool(self.vaccine_caused_health_issues)?;
        encoder.write_u8(self.healthcare_visits.bits())?;
        encoder.write_u8(self.pregnant.code())?;
        encoder.write_bool(self.pregnancy_test)?;
        encoder.write_u8(self.site_reaction.bits())?;
        encoder.write_u16(self.systemic_reaction.bits())?;
        encoder.write_bool(self.tested_positive)?;
        encoder.write_optional_date(self.tested_positive_date)
    }

    fn decode_fields<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        let date = decoder.read_date("date")?;

        let mut severity = |field: &'static str| decoder.read_u8_as(field, Severity::from_code);
        let symptoms = SymptomSeverities {
            abdominal_pain: severity("abdominal pain")?,
            chills: severity("chills")?,
            diarrhea: severity("diarrhea")?,
            fatigue: severity("fatigue")?,
            headache: severity("headache")?,
            itching: severity("itching")?,
            joint_pains: severity("joint pains")?,
            muscle_or_body_aches: severity("muscle or body aches")?,
            nausea: severity("nausea")?,
            pain: severity("pain")?,
            rash_outside_injection_site: severity("rash")?,
            redness: severity("redness")?,
            swelling: severity("swelling")?,
            vomiting: severity("vomiting")?,
        };

        Ok(Self {
            date,
            symptoms,
            feeling_today: decoder.read_u8_as("feeling today", Feeling::from_code)?,
            fever: decoder.read_bool("fever")?,
            had_symptoms: decoder.read_bool("had symptoms")?,
            health_impact: decoder.read_u8_as("health impact", HealthImpact::from_bits)?,
            health_now: decoder.read_u8_as("health now", HealthNow::from_code)?,
            health_now_comparison: decoder
                .read_u8_as("health now comparison", HealthChange::from_code)?,
            vaccine_caused_health_issues: decoder.read_bool("vaccine caused health issues")?,
            healthcare_visits: decoder
                .read_u8_as("healthcare visits", HealthcareVisits::from_bits)?,
            pregnant: decoder.read_u8_as("pregnant", PregnancyStatus::from_code)?,
            pregnancy_test: decoder.read_bool("pregnancy test")?,
            site_reaction: decoder.read_u8_as("site reaction", SiteReaction::from_bits)?,
            systemic_reaction: decoder
                .read_u16_as("systemic reaction", SystemicReaction::from_bits)?,
            tested_positive: decoder.read_bool("tested positive")?,
            tested_positive_date: decoder.read_optional_date("tested positive date")?,
        })
    }
}
