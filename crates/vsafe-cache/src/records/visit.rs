//! Per-subject health-care visit tallies.

use std::io::{Read, Write};

use super::codes::HealthcareVisits;
use crate::codec::{BinaryRecord, Decoder, Encoder};
use crate::error::Result;

/// Number of check-ins in which a subject reported each kind of visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitTally {
    /// Emergency room or emergency department visit.
    pub er: u32,
    /// Hospitalization.
    pub hospital: u32,
    /// Outpatient clinic or urgent care clinic visit.
    pub outpatient: u32,
    /// Telehealth, virtual health, or email health consultation.
    pub telehealth: u32,
}

impl VisitTally {
    /// True if any counter is non-zero.
    pub fn has_visit(&self) -> bool {
        !self.kinds().is_empty()
    }

    /// Count one check-in that reported `visits`.
    pub fn record(&mut self, visits: HealthcareVisits) {
        let counters = [
            (HealthcareVisits::ER, &mut self.er),
            (HealthcareVisits::HOSPITAL, &mut self.hospital),
            (HealthcareVisits::OUTPATIENT, &mut self.outpatient),
            (HealthcareVisits::TELEHEALTH, &mut self.telehealth),
        ];
        for (flag, counter) in counters {
            if visits.contains(flag) {
                *counter = counter.saturating_add(1);
            }
        }
    }

    /// Kinds of visit with a non-zero counter.
    pub fn kinds(&self) -> HealthcareVisits {
        let mut kinds = HealthcareVisits::EMPTY;
        for (flag, count) in [
            (HealthcareVisits::ER, self.er),
            (HealthcareVisits::HOSPITAL, self.hospital),
            (HealthcareVisits::OUTPATIENT, self.outpatient),
            (HealthcareVisits::TELEHEALTH, self.telehealth),
        ] {
            if count != 0 {
                kinds |= flag;
            }
        }
        kinds
    }
}

impl BinaryRecord for VisitTally {
    const NAME: &'static str = "visit tally";
    const VERSION: u8 = 1;

    fn encode_fields<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        encoder.write_u32(self.er)?;
        encoder.write_u32(self.hospital)?;
        encoder.write_u32(self.outpatient)?;
        encoder.write_u32(self.telehealth)
    }

    fn decode_fields<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        Ok(Self {
            er: decoder.read_u32()?,
            hospital: decoder.read_u32()?,
            outpatient: decoder.read_u32()?,
            telehealth: decoder.read_u32()?,
        })
    }
}
