use std::io::{Read, Write};

use vsafe_date::CalendarDate;

use crate::codec::{BinaryRecord, Decoder, Encoder};
use crate::error::Result;

/// One administered vaccine dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccineDose {
    pub date: CalendarDate,
    pub dose_number: u8,
}

impl BinaryRecord for VaccineDose {
    const NAME: &'static str = "vaccine dose";
    const VERSION: u8 = 1;

    fn encode_fields<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        encoder.write_date(self.date)?;
        encoder.write_u8(self.dose_number)
    }

    fn decode_fields<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        Ok(Self {
            date: decoder.read_date("date")?,
            dose_number: decoder.read_u8()?,
        })
    }
}
