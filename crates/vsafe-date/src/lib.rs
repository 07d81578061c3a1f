//! Proleptic Gregorian calendar dates.
//!
//! A [`CalendarDate`] is stored as a single day count ("rata die": 0001-01-01 is
//! day 1), so ordering, hashing and equality are plain integer operations. The
//! day count is also the on-disk representation used by the check-in cache, which
//! reserves `0` for "no date"; every representable date therefore has a day count
//! of at least 1.
//!
//! Conversions in both directions are closed-form, so converting millions of
//! survey dates costs the same regardless of how far apart they are.
//!
//! # Example
//!
//! ```
//! use vsafe_date::{CalendarDate, Weekday};
//!
//! let date = CalendarDate::parse("2/30/1997").unwrap();
//! assert_eq!(date.to_string(), "3/2/1997");
//! assert_eq!(date.weekday(), Weekday::Sunday);
//!
//! let same = CalendarDate::from_day_count(date.day_count()).unwrap();
//! assert_eq!(same, date);
//! ```

mod date;
mod error;
pub mod gregorian;

pub use date::{CalendarDate, MAX_DAY_COUNT, MAX_YEAR, MIN_DAY_COUNT, MIN_YEAR, Weekday};
pub use error::{DateError, Result};
pub use gregorian::is_leap_year;
