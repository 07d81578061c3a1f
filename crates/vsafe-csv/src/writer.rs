//! CSV record writer.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CsvError, Result};

/// Terminator written after every record.
pub const LINE_TERMINATOR: &str = "\n";

/// CSV writer.
///
/// Fields are quoted only when they contain a comma, a double quote or a line
/// break.
pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
    records_written: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Create a new CSV writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            records_written: 0,
        }
    }

    /// Write one record followed by [`LINE_TERMINATOR`].
    pub fn write_record<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, field) in fields.into_iter().enumerate() {
            if idx > 0 {
                self.writer.write_all(b",")?;
            }
            self.writer
                .write_all(escape_field(field.as_ref()).as_bytes())?;
        }
        self.writer.write_all(LINE_TERMINATOR.as_bytes())?;
        self.records_written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CsvError::Io(e.into_error()))
    }
}

impl CsvWriter<File> {
    /// Create a CSV file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| CsvError::File {
            operation: "create",
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(file))
    }
}

/// Escape a single field.
///
/// Fields without a comma, quote, `\n` or `\r` are returned unchanged; others
/// are wrapped in quotes with every embedded quote doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains([',', '"', '\n', '\r']) {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push('"');
    for ch in field.chars() {
        if ch == '"' {
            escaped.push('"');
        }
        escaped.push(ch);
    }
    escaped.push('"');
    Cow::Owned(escaped)
}
