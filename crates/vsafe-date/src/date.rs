//! The [`CalendarDate`] value type.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::{DateError, Result};
use crate::gregorian;

/// Earliest supported year.
pub const MIN_YEAR: i32 = 1;
/// Latest supported year.
pub const MAX_YEAR: i32 = 9999;
/// Day count of 0001-01-01.
pub const MIN_DAY_COUNT: i32 = 1;
/// Day count of 9999-12-31.
pub const MAX_DAY_COUNT: i32 = 3_652_059;

/// A calendar date in the proleptic Gregorian calendar.
///
/// Ordering follows the underlying day count, which is always in
/// `MIN_DAY_COUNT..=MAX_DAY_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    day_count: i32,
}

impl CalendarDate {
    /// Build a date from its parts, normalizing out-of-range months and days
    /// forward (February 30, 1997 becomes March 2, 1997).
    ///
    /// Fails only when the normalized date falls outside years 1 through 9999.
    pub fn from_parts(year: i32, month: i32, day: i32) -> Result<Self> {
        let count = gregorian::day_count(i64::from(year), i64::from(month), i64::from(day));
        Self::checked(count)
    }

    /// Build a date from a day count.
    pub fn from_day_count(day_count: i32) -> Result<Self> {
        Self::checked(i64::from(day_count))
    }

    fn checked(day_count: i64) -> Result<Self> {
        if day_count < i64::from(MIN_DAY_COUNT) || day_count > i64::from(MAX_DAY_COUNT) {
            return Err(DateError::OutOfRange { day_count });
        }
        Ok(Self {
            day_count: day_count as i32,
        })
    }

    /// Parse `month/day/year`, e.g. `12/4/2020` or `03/07/2021`.
    ///
    /// Components are not range-checked individually; they are normalized the
    /// same way as [`from_parts`](Self::from_parts).
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split('/');
        let (Some(month), Some(day), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DateError::invalid_format(text));
        };

        let month = parse_component(text, month, "month")?;
        let day = parse_component(text, day, "day")?;
        let year = parse_component(text, year, "year")?;
        Self::from_parts(year, month, day)
    }

    /// Days since the epoch; 0001-01-01 is day 1.
    #[must_use]
    pub const fn day_count(self) -> i32 {
        self.day_count
    }

    /// Year, month (1-based) and day (1-based).
    #[must_use]
    pub fn ymd(self) -> (i32, u32, u32) {
        let (year, month, day) = gregorian::ymd_of(i64::from(self.day_count));
        (year as i32, month as u32, day as u32)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.ymd().0
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.ymd().1
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.ymd().2
    }

    /// Day of the week. The cycle is anchored at the epoch, which was a Monday.
    #[must_use]
    pub fn weekday(self) -> Weekday {
        Weekday::from_index(self.day_count.rem_euclid(7))
    }

    /// Add (or subtract) days, returning `None` outside the supported range.
    #[must_use]
    pub fn checked_add_days(self, days: i32) -> Option<Self> {
        Self::checked(i64::from(self.day_count) + i64::from(days)).ok()
    }

    /// Signed number of days from `earlier` to `self`.
    #[must_use]
    pub const fn days_since(self, earlier: Self) -> i32 {
        self.day_count - earlier.day_count
    }

    /// Convert to a chrono date.
    #[must_use]
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(self.day_count)
    }
}

fn parse_component(text: &str, part: &str, component: &'static str) -> Result<i32> {
    part.parse::<i32>()
        .map_err(|_| DateError::invalid_component(text, component))
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.ymd();
        write!(f, "{month}/{day}/{year}")
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::from_day_count(date.num_days_from_ce())
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    /// 1 for Sunday through 7 for Saturday.
    #[must_use]
    pub fn number_from_sunday(self) -> u32 {
        self as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: i32, day: i32) -> CalendarDate {
        CalendarDate::from_parts(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let d = CalendarDate::parse("12/4/2020").unwrap();
        assert_eq!(d.ymd(), (2020, 12, 4));
        assert_eq!(d.to_string(), "12/4/2020");

        let padded = CalendarDate::parse("03/07/2021").unwrap();
        assert_eq!(padded.to_string(), "3/7/2021");
    }

    #[test]
    fn test_parse_normalizes_invalid_days() {
        let d = CalendarDate::parse("2/30/1997").unwrap();
        assert_eq!(d, date(1997, 3, 2));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(matches!(
            CalendarDate::parse("2024-01-15"),
            Err(DateError::InvalidFormat { .. })
        ));
        assert!(matches!(
            CalendarDate::parse("1/2/3/4"),
            Err(DateError::InvalidFormat { .. })
        ));
        assert!(matches!(
            CalendarDate::parse("1/2"),
            Err(DateError::InvalidFormat { .. })
        ));
        assert!(matches!(
            CalendarDate::parse(""),
            Err(DateError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            CalendarDate::parse("1/x/2020"),
            Err(DateError::invalid_component("1/x/2020", "day"))
        );
        assert_eq!(
            CalendarDate::parse("1/2/"),
            Err(DateError::invalid_component("1/2/", "year"))
        );
    }

    #[test]
    fn test_out_of_range() {
        assert!(CalendarDate::from_parts(0, 12, 31).is_err());
        assert!(CalendarDate::from_parts(10_000, 1, 1).is_err());
        assert!(CalendarDate::from_day_count(0).is_err());
        assert!(CalendarDate::from_day_count(MAX_DAY_COUNT + 1).is_err());
        assert_eq!(date(1, 1, 1).day_count(), MIN_DAY_COUNT);
        assert_eq!(date(9999, 12, 31).day_count(), MAX_DAY_COUNT);
    }

    #[test]
    fn test_ordering_follows_chronology() {
        assert!(date(2021, 1, 5) < date(2021, 1, 6));
        assert!(date(2020, 12, 31) < date(2021, 1, 1));
        assert_eq!(
            date(2021, 3, 1).cmp(&date(2021, 3, 1)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_weekday() {
        assert_eq!(date(1, 1, 1).weekday(), Weekday::Monday);
        assert_eq!(date(2021, 1, 1).weekday(), Weekday::Friday);
        assert_eq!(date(2000, 1, 2).weekday(), Weekday::Sunday);
        assert_eq!(Weekday::Sunday.number_from_sunday(), 1);
        assert_eq!(Weekday::Saturday.number_from_sunday(), 7);
    }

    #[test]
    fn test_day_arithmetic() {
        let start = date(2021, 2, 27);
        assert_eq!(start.checked_add_days(2), Some(date(2021, 3, 1)));
        assert_eq!(date(2021, 3, 1).days_since(start), 2);
        assert_eq!(date(1, 1, 1).checked_add_days(-1), None);
    }

    #[test]
    fn test_chrono_conversion() {
        let d = date(2021, 4, 15);
        let naive = d.to_naive_date().unwrap();
        assert_eq!(naive, NaiveDate::from_ymd_opt(2021, 4, 15).unwrap());
        assert_eq!(CalendarDate::try_from(naive).unwrap(), d);
    }
}
