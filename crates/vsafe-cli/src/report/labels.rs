//! Answer texts used in the check-in export.
//!
//! Single-choice answers map to the index of their label; multi-select answers
//! are `:`-separated lists folded into flag sets. Matching ignores ASCII case.

use std::ops::BitOrAssign;

use vsafe_cache::{
    Feeling, HealthChange, HealthImpact, HealthNow, HealthcareVisits, PregnancyStatus, Severity,
    SiteReaction, SystemicReaction,
};

use super::error::{ReportError, Result};

pub const SEVERITY: [&str; 4] = ["", "Mild", "Moderate", "Severe"];
pub const HEALTH_NOW: [&str; 5] = ["", "Excellent", "Good", "Fair", "Poor"];
pub const FEELING: [&str; 4] = ["", "Poor", "Fair", "Good"];
pub const HEALTH_CHANGE: [&str; 4] = ["", "Worse", "About the same", "Better"];
pub const PREGNANCY: [&str; 3] = ["I don't know", "Yes", "No"];
pub const YES_NO: [&str; 2] = ["No", "Yes"];

pub const HEALTH_IMPACT: [&str; 5] = [
    "Be unable to do their normal daily activities",
    "Be unable to work",
    "Be unable to do your normal daily activities",
    "Get care from a doctor or other healthcare professional",
    "Be unable to work or attend school",
];

pub const HEALTHCARE_VISITS: [&str; 4] = [
    "Emergency room or emergency department visit",
    "Hospitalization",
    "Outpatient clinic or urgent care clinic visit",
    "Telehealth, virtual health, or email health consultation",
];

pub const SITE_REACTION: [&str; 4] = ["Pain", "Redness", "Swelling", "Itching"];

pub const SYSTEMIC_REACTION: [&str; 10] = [
    "Abdominal pain",
    "Chills",
    "Diarrhea",
    "Fatigue or tiredness",
    "Headache",
    "Joint pains",
    "Muscle or body aches",
    "Nausea",
    "Rash, not including the immediate area around the injection site",
    "Vomiting",
];

/// Separator between options in a multi-select answer.
pub const OPTION_SEPARATOR: char = ':';

/// Answers that mean "nothing selected" in a multi-select column.
const NO_SELECTION: [&str; 3] = ["", "None", "N/A"];

/// Index of the label matching `value`.
pub fn position(labels: &[&str], value: &str) -> Option<usize> {
    labels
        .iter()
        .position(|label| label.eq_ignore_ascii_case(value))
}

fn coded<T>(
    column: &'static str,
    value: &str,
    labels: &[&str],
    from_code: impl FnOnce(u8) -> Option<T>,
) -> Result<T> {
    position(labels, value)
        .and_then(|idx| u8::try_from(idx).ok())
        .and_then(from_code)
        .ok_or_else(|| ReportError::unknown_value(column, value))
}

pub fn severity(column: &'static str, value: &str) -> Result<Severity> {
    coded(column, value, &SEVERITY, Severity::from_code)
}

pub fn health_now(column: &'static str, value: &str) -> Result<HealthNow> {
    coded(column, value, &HEALTH_NOW, HealthNow::from_code)
}

pub fn feeling(column: &'static str, value: &str) -> Result<Feeling> {
    coded(column, value, &FEELING, Feeling::from_code)
}

pub fn health_change(column: &'static str, value: &str) -> Result<HealthChange> {
    coded(column, value, &HEALTH_CHANGE, HealthChange::from_code)
}

/// Unrecognized answers read as [`PregnancyStatus::Unknown`].
pub fn pregnancy(value: &str) -> PregnancyStatus {
    coded("", value, &PREGNANCY, PregnancyStatus::from_code).unwrap_or_default()
}

/// Only "Yes" is true; blanks and unrecognized answers are false.
pub fn yes_no(value: &str) -> bool {
    position(&YES_NO, value) == Some(1)
}

fn flags<F>(
    column: &'static str,
    value: &str,
    options: &[&str],
    from_index: impl Fn(usize) -> Option<F>,
) -> Result<F>
where
    F: Default + BitOrAssign,
{
    let mut set = F::default();
    if position(&NO_SELECTION, value).is_some() {
        return Ok(set);
    }
    for part in value.split(OPTION_SEPARATOR) {
        let flag = position(options, part)
            .and_then(&from_index)
            .ok_or_else(|| ReportError::unknown_value(column, part))?;
        set |= flag;
    }
    Ok(set)
}

pub fn healthcare_visits(column: &'static str, value: &str) -> Result<HealthcareVisits> {
    flags(column, value, &HEALTHCARE_VISITS, HealthcareVisits::from_index)
}

pub fn health_impact(column: &'static str, value: &str) -> Result<HealthImpact> {
    flags(column, value, &HEALTH_IMPACT, HealthImpact::from_index)
}

pub fn site_reaction(column: &'static str, value: &str) -> Result<SiteReaction> {
    flags(column, value, &SITE_REACTION, SiteReaction::from_index)
}

pub fn systemic_reaction(column: &'static str, value: &str) -> Result<SystemicReaction> {
    flags(column, value, &SYSTEMIC_REACTION, SystemicReaction::from_index)
}
