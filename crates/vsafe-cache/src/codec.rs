//! Binary encoding primitives.
//!
//! All integers are little-endian. Each record starts with its own version
//! byte, written by [`BinaryRecord::encode`] and checked by
//! [`BinaryRecord::decode`] before any field is read.
//!
//! | Type                     | Encoding                                  |
//! |--------------------------|-------------------------------------------|
//! | `u8`, `bool`             | 1 byte (`bool` is 0 or 1)                 |
//! | `u16`                    | 2 bytes                                   |
//! | `u32`, count             | 4 bytes                                   |
//! | `CalendarDate`           | 4-byte day count                          |
//! | `Option<CalendarDate>`   | 4-byte day count, `0` when absent         |
//! | string                   | 4-byte byte length, then UTF-8 bytes      |
//! | sequence                 | 4-byte count, then each record            |

use std::io::{self, Read, Write};

use vsafe_date::CalendarDate;

use crate::error::{CacheError, Result};

/// Day count written for an absent optional date. No valid date maps to it.
pub const NO_DATE: i32 = 0;

/// Upper bound on speculative preallocation from an untrusted count.
const MAX_PREALLOCATE: usize = 4096;

/// A record with a fixed binary layout and a version tag.
pub trait BinaryRecord: Sized {
    /// Name used in error messages.
    const NAME: &'static str;
    /// Layout revision; bump whenever fields change.
    const VERSION: u8;

    /// Write fields in declared order (without the version byte).
    fn encode_fields<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()>;

    /// Read fields in declared order (the version byte is already checked).
    fn decode_fields<R: Read>(decoder: &mut Decoder<R>) -> Result<Self>;

    /// Write the version byte followed by the fields.
    fn encode<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        encoder.write_u8(Self::VERSION)?;
        self.encode_fields(encoder)
    }

    /// Check the version byte, then read the fields.
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self> {
        decoder.expect_version(Self::NAME, Self::VERSION)?;
        Self::decode_fields(decoder)
    }
}

/// Encode a single record into a byte vector.
pub fn to_bytes<T: BinaryRecord>(record: &T) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(Vec::new());
    record.encode(&mut encoder)?;
    Ok(encoder.into_inner())
}

/// Decode a single record, rejecting trailing bytes.
pub fn from_bytes<T: BinaryRecord>(bytes: &[u8]) -> Result<T> {
    let mut decoder = Decoder::new(bytes);
    let record = T::decode(&mut decoder)?;
    decoder.finish()?;
    Ok(record)
}

/// Writes primitive values.
pub struct Encoder<W: Write> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_date(&mut self, date: CalendarDate) -> Result<()> {
        self.write_i32(date.day_count())
    }

    pub fn write_optional_date(&mut self, date: Option<CalendarDate>) -> Result<()> {
        self.write_i32(date.map_or(NO_DATE, CalendarDate::day_count))
    }

    /// Write a collection length as a 4-byte count.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let count = u32::try_from(len).map_err(|_| CacheError::LengthOverflow { len })?;
        self.write_u32(count)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_len(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    /// Write a count followed by each record.
    pub fn write_records<T: BinaryRecord>(&mut self, records: &[T]) -> Result<()> {
        self.write_len(records.len())?;
        for record in records {
            record.encode(self)?;
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }
}

/// Reads primitive values.
///
/// End of input inside a value is reported as [`CacheError::Truncated`],
/// naming the innermost record being decoded.
pub struct Decoder<R: Read> {
    reader: R,
    record: &'static str,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            record: "cache",
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read a version byte and fail unless it equals `expected`.
    pub fn expect_version(&mut self, record: &'static str, expected: u8) -> Result<()> {
        self.record = record;
        let found = self.read_u8()?;
        if found != expected {
            return Err(CacheError::VersionMismatch {
                record,
                expected,
                found,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.invalid(field, i64::from(other))),
        }
    }

    /// Read a byte and convert it, rejecting codes `convert` does not accept.
    pub fn read_u8_as<T>(
        &mut self,
        field: &'static str,
        convert: impl FnOnce(u8) -> Option<T>,
    ) -> Result<T> {
        let code = self.read_u8()?;
        convert(code).ok_or_else(|| self.invalid(field, i64::from(code)))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Two-byte counterpart of [`Decoder::read_u8_as`].
    pub fn read_u16_as<T>(
        &mut self,
        field: &'static str,
        convert: impl FnOnce(u16) -> Option<T>,
    ) -> Result<T> {
        let code = self.read_u16()?;
        convert(code).ok_or_else(|| self.invalid(field, i64::from(code)))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read a date that must be present.
    pub fn read_date(&mut self, field: &'static str) -> Result<CalendarDate> {
        let count = self.read_i32()?;
        CalendarDate::from_day_count(count).map_err(|_| self.invalid(field, i64::from(count)))
    }

    /// Read a date where `0` means absent.
    pub fn read_optional_date(&mut self, field: &'static str) -> Result<Option<CalendarDate>> {
        let count = self.read_i32()?;
        if count == NO_DATE {
            return Ok(None);
        }
        CalendarDate::from_day_count(count)
            .map(Some)
            .map_err(|_| self.invalid(field, i64::from(count)))
    }

    /// Read a 4-byte collection count.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATE));
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut bytes)?;
        if read < len {
            return Err(CacheError::Truncated {
                record: self.record,
            });
        }
        String::from_utf8(bytes).map_err(|_| CacheError::InvalidKey {
            record: self.record,
        })
    }

    /// Read a count followed by that many records.
    pub fn read_records<T: BinaryRecord>(&mut self) -> Result<Vec<T>> {
        let count = self.read_len()?;
        let mut records = Vec::with_capacity(count.min(MAX_PREALLOCATE));
        for _ in 0..count {
            records.push(T::decode(self)?);
        }
        Ok(records)
    }

    /// Fail if any bytes remain.
    pub fn finish(mut self) -> Result<()> {
        let mut probe = [0u8; 1];
        loop {
            match self.reader.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => return Err(CacheError::TrailingBytes),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CacheError::Stream(e)),
            }
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                CacheError::Truncated {
                    record: self.record,
                }
            } else {
                CacheError::Stream(e)
            }
        })?;
        Ok(buf)
    }

    fn invalid(&self, field: &'static str, value: i64) -> CacheError {
        CacheError::InvalidValue {
            record: self.record,
            field,
            value,
        }
    }
}
