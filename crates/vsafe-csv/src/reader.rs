//! Streaming CSV record reader.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{CsvError, Result};
use crate::header::CsvHeader;

/// One parsed row.
pub type Record = Vec<String>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Buffer size used by [`CsvReader::open`]; survey exports are read front to back.
const FILE_BUFFER_LEN: usize = 1 << 20;

/// Parser position within the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Nothing consumed for this record yet.
    AtRecordStart,
    /// Just past a comma; a quote here opens a quoted field.
    FieldStart,
    /// Unquoted text, or text after a closing quote.
    InField,
    /// Between an opening quote and its closing quote.
    InQuotedField,
    /// Input exhausted and the final record already returned.
    Done,
}

struct Progress {
    interval: u64,
    callback: Box<dyn FnMut(u64)>,
}

/// Streaming CSV reader.
///
/// Reads one record per call and keeps only that record in memory. The field
/// buffer is reused across fields so long fields grow it geometrically instead
/// of reallocating per byte.
pub struct CsvReader<R: Read> {
    reader: BufReader<R>,
    state: ParseState,
    field: Vec<u8>,
    bom_checked: bool,
    records_read: u64,
    progress: Option<Progress>,
}

impl<R: Read> CsvReader<R> {
    /// Create a new CSV reader.
    pub fn new(reader: R) -> Self {
        Self::from_buf_reader(BufReader::new(reader))
    }

    /// Create a new CSV reader with a specific buffer size.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self::from_buf_reader(BufReader::with_capacity(capacity, reader))
    }

    fn from_buf_reader(reader: BufReader<R>) -> Self {
        Self {
            reader,
            state: ParseState::AtRecordStart,
            field: Vec::new(),
            bom_checked: false,
            records_read: 0,
            progress: None,
        }
    }

    /// Call `callback` with the running record count every `interval` records.
    ///
    /// An interval of zero disables the callback.
    #[must_use]
    pub fn with_progress(mut self, interval: u64, callback: impl FnMut(u64) + 'static) -> Self {
        self.progress = (interval > 0).then(|| Progress {
            interval,
            callback: Box::new(callback),
        });
        self
    }

    /// Records returned so far, including the header.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the first record as a header row.
    pub fn read_header(&mut self) -> Result<CsvHeader> {
        self.read_record()?
            .map(CsvHeader::new)
            .ok_or(CsvError::MissingHeader)
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the input is exhausted. After an I/O error the
    /// reader is finished and keeps returning `Ok(None)`.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if self.state == ParseState::Done {
            return Ok(None);
        }
        match self.parse_record() {
            Ok(Some(record)) => {
                self.record_done();
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.state = ParseState::Done;
                Err(e)
            }
        }
    }

    fn parse_record(&mut self) -> Result<Option<Record>> {
        let mut record = Record::new();
        self.state = ParseState::AtRecordStart;
        self.field.clear();
        if !self.bom_checked {
            self.skip_bom()?;
        }

        loop {
            let buf = fill_buf(&mut self.reader)?;

            if buf.is_empty() {
                if self.state == ParseState::AtRecordStart {
                    self.state = ParseState::Done;
                    return Ok(None);
                }
                // Unterminated last line, possibly inside an open quote.
                record.push(self.take_field());
                self.state = ParseState::Done;
                return Ok(Some(record));
            }

            match self.state {
                ParseState::AtRecordStart | ParseState::FieldStart => {
                    if buf[0] == b'"' {
                        self.reader.consume(1);
                        self.state = ParseState::InQuotedField;
                    } else {
                        self.state = ParseState::InField;
                    }
                }
                ParseState::InField => {
                    let Some(pos) = buf
                        .iter()
                        .position(|&b| matches!(b, b',' | b'\n' | b'\r'))
                    else {
                        let len = buf.len();
                        self.field.extend_from_slice(buf);
                        self.reader.consume(len);
                        continue;
                    };

                    let delimiter = buf[pos];
                    self.field.extend_from_slice(&buf[..pos]);
                    self.reader.consume(pos + 1);
                    record.push(self.take_field());

                    if delimiter == b',' {
                        self.state = ParseState::FieldStart;
                    } else {
                        self.skip_line_pair(delimiter)?;
                        return Ok(Some(record));
                    }
                }
                ParseState::InQuotedField => {
                    let Some(pos) = buf.iter().position(|&b| b == b'"') else {
                        let len = buf.len();
                        self.field.extend_from_slice(buf);
                        self.reader.consume(len);
                        continue;
                    };

                    self.field.extend_from_slice(&buf[..pos]);
                    self.reader.consume(pos + 1);

                    if self.peek_byte()? == Some(b'"') {
                        self.reader.consume(1);
                        self.field.push(b'"');
                    } else {
                        self.state = ParseState::InField;
                    }
                }
                ParseState::Done => return Ok(None),
            }
        }
    }

    /// Consume the second half of a `\r\n` or `\n\r` pair, if present.
    fn skip_line_pair(&mut self, first: u8) -> Result<()> {
        let partner = if first == b'\n' { b'\r' } else { b'\n' };
        if self.peek_byte()? == Some(partner) {
            self.reader.consume(1);
        }
        Ok(())
    }

    /// Consume a leading byte-order mark one byte at a time, so short reads
    /// still see it. A partial match is kept as the start of the first field.
    fn skip_bom(&mut self) -> Result<()> {
        self.bom_checked = true;
        let mut matched = 0;
        while matched < UTF8_BOM.len() && self.peek_byte()? == Some(UTF8_BOM[matched]) {
            self.reader.consume(1);
            matched += 1;
        }
        if matched > 0 && matched < UTF8_BOM.len() {
            self.field.extend_from_slice(&UTF8_BOM[..matched]);
            self.state = ParseState::InField;
        }
        Ok(())
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(fill_buf(&mut self.reader)?.first().copied())
    }

    /// Decode the pending field, replacing invalid UTF-8, and reset the buffer.
    fn take_field(&mut self) -> String {
        let text = match std::str::from_utf8(&self.field) {
            Ok(text) => text.to_owned(),
            Err(_) => String::from_utf8_lossy(&self.field).into_owned(),
        };
        self.field.clear();
        text
    }

    fn record_done(&mut self) {
        self.records_read += 1;
        if let Some(progress) = self.progress.as_mut()
            && self.records_read % progress.interval == 0
        {
            (progress.callback)(self.records_read);
        }
    }
}

fn fill_buf<R: Read>(reader: &mut BufReader<R>) -> Result<&[u8]> {
    loop {
        match reader.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CsvError::Io(e)),
        }
    }
    reader.fill_buf().map_err(CsvError::Io)
}

impl CsvReader<File> {
    /// Open a CSV file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CsvError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CsvError::File {
                    operation: "open",
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        tracing::debug!(path = %path.display(), "opened CSV file");
        Ok(Self::with_capacity(FILE_BUFFER_LEN, file))
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
