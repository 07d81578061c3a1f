//! Streaming CSV records for multi-gigabyte survey exports.
//!
//! The reader pulls one record at a time from any [`std::io::Read`] source and
//! never holds more than the current record in memory. Quoting follows RFC 4180
//! with two deliberate leniencies:
//!
//! - a closing quote followed by more text keeps appending to the same field
//!   (`"ab"cd` reads as `abcd`);
//! - an unterminated quoted field at end of input ends the field as-is.
//!
//! `\n`, `\r`, `\r\n` and `\n\r` all end a record outside quotes.
//!
//! # Example
//!
//! ```
//! use vsafe_csv::{CsvReader, CsvWriter};
//!
//! let mut reader = CsvReader::new("A,B,C\n1,2,3\n4,5,\"6,7\"\n".as_bytes());
//! let header = reader.read_header().unwrap();
//! assert_eq!(header.lookup("b").unwrap(), 1);
//!
//! let rows: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
//! assert_eq!(rows[1], ["4", "5", "6,7"]);
//!
//! let mut out = CsvWriter::new(Vec::new());
//! out.write_record(&rows[1]).unwrap();
//! assert_eq!(out.into_inner().unwrap(), b"4,5,\"6,7\"\n");
//! ```

mod error;
mod header;
mod reader;
mod writer;

// === Error Types ===
pub use error::{CsvError, Result};

// === Header Lookup ===
pub use header::{CsvHeader, field_at};

// === Reading ===
pub use reader::{CsvReader, Record};

// === Writing ===
pub use writer::{CsvWriter, LINE_TERMINATOR, escape_field};
