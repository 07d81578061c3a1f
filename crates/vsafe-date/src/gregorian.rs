//! Closed-form proleptic Gregorian arithmetic on rata die day counts.
//!
//! These functions work on `i64` and accept any component values; range
//! checking happens in [`CalendarDate`](crate::CalendarDate).

/// Day count of 0001-01-01.
pub const EPOCH: i64 = 1;

const DAYS_PER_400_YEARS: i64 = 146_097;
const DAYS_PER_100_YEARS: i64 = 36_524;
const DAYS_PER_4_YEARS: i64 = 1_461;
const DAYS_PER_YEAR: i64 = 365;

/// Gregorian leap year rule.
///
/// ```
/// use vsafe_date::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// ```
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    is_leap(year as i64)
}

const fn is_leap(year: i64) -> bool {
    if year % 4 != 0 {
        return false; // 2017
    }
    if year % 100 != 0 {
        return true; // 1996
    }
    year % 400 == 0 // 1900 vs 2000
}

/// Day count for a year/month/day triple.
///
/// Months outside 1..=12 carry into the year and days outside the month carry
/// into neighbouring months, so February 30 lands in early March.
#[must_use]
pub fn day_count(year: i64, month: i64, day: i64) -> i64 {
    let year = year + (month - 1).div_euclid(12);
    let month = (month - 1).rem_euclid(12) + 1;

    let y1 = year - 1;
    let mut days = DAYS_PER_YEAR * y1 + y1.div_euclid(4) - y1.div_euclid(100) + y1.div_euclid(400);

    // Days before the first of `month`, assuming a 30-day February.
    days += (367 * month - 362) / 12;
    if month > 2 {
        days -= if is_leap(year) { 1 } else { 2 };
    }

    days + day + (EPOCH - 1)
}

/// Gregorian year containing the given day count.
#[must_use]
pub fn year_of(day_count: i64) -> i64 {
    let d0 = day_count - EPOCH;
    let n400 = d0.div_euclid(DAYS_PER_400_YEARS);
    let d1 = d0.rem_euclid(DAYS_PER_400_YEARS);
    let n100 = d1 / DAYS_PER_100_YEARS;
    let d2 = d1 % DAYS_PER_100_YEARS;
    let n4 = d2 / DAYS_PER_4_YEARS;
    let d3 = d2 % DAYS_PER_4_YEARS;
    let n1 = d3 / DAYS_PER_YEAR;

    let year = 400 * n400 + 100 * n100 + 4 * n4 + n1;
    // Day 366 of a leap year, or the last day of a 400-year cycle.
    if n100 == 4 || n1 == 4 { year } else { year + 1 }
}

/// Year, month and day for a day count.
#[must_use]
pub fn ymd_of(day_count: i64) -> (i64, i64, i64) {
    let year = year_of(day_count);
    let prior_days = day_count - self::day_count(year, 1, 1);

    let correction = if day_count < self::day_count(year, 3, 1) {
        0
    } else if is_leap(year) {
        1
    } else {
        2
    };

    let month = (12 * (prior_days + correction) + 373) / 367;
    let day = day_count - self::day_count(year, month, 1) + 1;
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(!is_leap_year(2017));
        assert!(!is_leap_year(2100));
    }

    #[test]
    fn test_epoch_is_day_one() {
        assert_eq!(day_count(1, 1, 1), 1);
        assert_eq!(ymd_of(1), (1, 1, 1));
    }

    #[test]
    fn test_known_day_counts() {
        assert_eq!(day_count(1970, 1, 1), 719_163);
        assert_eq!(day_count(2000, 3, 1), 730_180);
        assert_eq!(day_count(9999, 12, 31), 3_652_059);
    }

    #[test]
    fn test_month_overflow_rolls_into_next_year() {
        assert_eq!(day_count(2020, 13, 1), day_count(2021, 1, 1));
        assert_eq!(day_count(2020, 14, 1), day_count(2021, 2, 1));
        assert_eq!(day_count(2020, 0, 1), day_count(2019, 12, 1));
    }

    #[test]
    fn test_day_overflow_rolls_into_next_month() {
        assert_eq!(day_count(1997, 2, 30), day_count(1997, 3, 2));
        assert_eq!(day_count(1996, 2, 30), day_count(1996, 3, 1));
        assert_eq!(day_count(2021, 3, 0), day_count(2021, 2, 28));
    }

    #[test]
    fn test_year_boundaries() {
        assert_eq!(ymd_of(day_count(400, 12, 31)), (400, 12, 31));
        assert_eq!(ymd_of(day_count(401, 1, 1)), (401, 1, 1));
        assert_eq!(ymd_of(day_count(2000, 12, 31)), (2000, 12, 31));
        assert_eq!(ymd_of(day_count(2003, 12, 31)), (2003, 12, 31));
        assert_eq!(ymd_of(day_count(2004, 12, 31)), (2004, 12, 31));
    }

    #[test]
    fn test_march_correction_band() {
        assert_eq!(ymd_of(day_count(2020, 2, 29)), (2020, 2, 29));
        assert_eq!(ymd_of(day_count(2020, 3, 1)), (2020, 3, 1));
        assert_eq!(ymd_of(day_count(2021, 2, 28)), (2021, 2, 28));
        assert_eq!(ymd_of(day_count(2021, 3, 1)), (2021, 3, 1));
    }
}
