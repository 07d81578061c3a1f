//! Cached aggregate records.

mod checkin;
mod codes;
mod dose;
mod history;
mod visit;

pub use checkin::{CheckinReport, SymptomSeverities};
pub use codes::{
    Feeling, HealthChange, HealthImpact, HealthNow, HealthcareVisits, PregnancyStatus, Severity,
    SiteReaction, SystemicReaction,
};
pub use dose::VaccineDose;
pub use history::SubjectHistory;
pub use visit::VisitTally;
