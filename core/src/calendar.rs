//! Calendar date/time conversions using O(1) algorithms
//!
//! Implements Howard Hinnant's civil_from_days and days_from_civil algorithms.
//! Reference: http://howardhinnant.github.io/date_algorithms.html
//!
//! These give the same year/month/day as walking year and month lengths from
//! 1970, without the loop:
//! - O(1) time complexity (no year iteration)
//! - Correct handling of leap years
//! - Valid for all dates in the proleptic Gregorian calendar
//!
//! Every `u32` epoch value (1970-01-01 to 2106-02-07) maps to a valid date.
#![deny(unsafe_code)]

use core::fmt;

use crate::status::SyncStatus;

const SECONDS_PER_DAY: u32 = 86_400;

/// Days from 0000-03-01 to 1970-01-01
const DAYS_TO_UNIX_EPOCH: i64 = 719_468;

/// Day of the week, numbered 1 (Sunday) through 7 (Saturday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    /// Weekday for a count of days since 1970-01-01 (a Thursday)
    pub const fn from_days_since_epoch(days: u32) -> Self {
        match (days % 7 + 4) % 7 {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }

    /// 1 = Sunday ... 7 = Saturday
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }
}

/// 12-hour period marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Period {
    /// 24-hour display, no marker
    #[default]
    None,
    Am,
    Pm,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// How the hour field is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourFormat {
    #[default]
    TwentyFourHour,
    /// Hours 13-23 are reduced by 12 and tagged PM; hour 0 stays 0 AM
    TwelveHour,
}

/// Broken-down calendar time
///
/// Produced fresh by every conversion. `status` tells the caller whether the
/// fields carry a synchronized time at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Absolute year, e.g. 2024
    pub year: u16,
    /// 1 = January
    pub month: u8,
    /// 1-based day of month
    pub day: u8,
    pub weekday: Weekday,
    pub period: Period,
    pub status: SyncStatus,
}

impl CalendarTime {
    /// Copy of `self` carrying `status`
    pub const fn with_status(self, status: SyncStatus) -> Self {
        Self { status, ..self }
    }

    pub fn is_valid(&self) -> bool {
        self.status == SyncStatus::Valid
    }
}

impl Default for CalendarTime {
    /// The Unix epoch with no data attached
    fn default() -> Self {
        to_calendar(0, HourFormat::TwentyFourHour)
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {} {} {:02}:{:02}:{:02}",
            self.weekday.name(),
            self.day,
            month_name(self.month),
            self.year,
            self.hour,
            self.minute,
            self.second
        )?;
        match self.period {
            Period::None => Ok(()),
            period => write!(f, " {}", period.as_str()),
        }
    }
}

/// English month name for 1-12, `"Invalid"` otherwise
pub const fn month_name(month: u8) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid",
    }
}

/// Check if year is a leap year (Gregorian calendar)
///
/// - 2000: leap (divisible by 400)
/// - 1900: NOT leap (divisible by 100 but not 400)
/// - 2024: leap (divisible by 4, not by 100)
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, 0 for an invalid month
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Convert Unix seconds to calendar fields
///
/// Total and side-effect free. The result carries `SyncStatus::NoData`;
/// callers that know the input is a synchronized time mark it themselves.
pub fn to_calendar(unix_secs: u32, format: HourFormat) -> CalendarTime {
    let days_since_epoch = unix_secs / SECONDS_PER_DAY;
    let secs_today = unix_secs % SECONDS_PER_DAY;

    let hour = (secs_today / 3600) as u8;
    let minute = ((secs_today % 3600) / 60) as u8;
    let second = (secs_today % 60) as u8;

    let (year, month, day) = civil_from_days(days_since_epoch);

    let (hour, period) = match format {
        HourFormat::TwentyFourHour => (hour, Period::None),
        HourFormat::TwelveHour if hour >= 13 => (hour - 12, Period::Pm),
        HourFormat::TwelveHour if hour == 12 => (hour, Period::Pm),
        HourFormat::TwelveHour => (hour, Period::Am),
    };

    CalendarTime {
        hour,
        minute,
        second,
        year,
        month,
        day,
        weekday: Weekday::from_days_since_epoch(days_since_epoch),
        period,
        status: SyncStatus::NoData,
    }
}

/// Convert a civil date and time back to Unix seconds
///
/// Returns `None` for out-of-range fields or instants outside the `u32`
/// epoch range.
pub fn unix_from_civil(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> Option<u32> {
    if month == 0 || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let days = days_from_civil(year, month, day);
    let secs = days * SECONDS_PER_DAY as i64
        + hour as i64 * 3600
        + minute as i64 * 60
        + second as i64;
    u32::try_from(secs).ok()
}

/// Convert days since Unix epoch to civil date (year, month, day)
///
/// Howard Hinnant's civil_from_days algorithm, specialised to non-negative
/// day counts.
fn civil_from_days(days_since_epoch: u32) -> (u16, u8, u8) {
    // Shift epoch from 1970-01-01 to 0000-03-01 (March 1, year 0)
    // This makes the year start on March 1, placing leap day at end of year
    let z = days_since_epoch as i64 + DAYS_TO_UNIX_EPOCH;

    // Calculate era (400-year cycles); z is never negative here
    let era = z / 146_097;
    let doe = (z - era * 146_097) as u32; // day of era [0, 146096]

    // Calculate year of era [0, 399]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;

    let y = yoe as i64 + era * 400;

    // Calculate day of year [0, 365]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);

    // Calculate month [0, 11] where 0 = March, 11 = February
    let mp = (5 * doy + 2) / 153;

    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;

    // Adjust year for January and February
    let year = if m <= 2 { y + 1 } else { y };

    (year as u16, m, d)
}

/// Convert civil date (year, month, day) to days since Unix epoch
///
/// Howard Hinnant's days_from_civil algorithm.
fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = year as i64;
    let m = month as i64;
    let d = day as i64;

    // Adjust year and month to make March = month 0, February = month 11
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // year of era [0, 399]
    let doy = (153 * m + 2) / 5 + d - 1; // day of year [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era [0, 146096]

    era * 146_097 + doe - DAYS_TO_UNIX_EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference conversion walking year and month lengths from 1970
    fn walk_calendar(unix_secs: u32) -> (u16, u8, u8) {
        let mut days = unix_secs / SECONDS_PER_DAY;
        let mut year = 1970u16;
        loop {
            let len = if is_leap_year(year) { 366 } else { 365 };
            if days < len {
                break;
            }
            days -= len;
            year += 1;
        }
        let mut month = 1u8;
        while days >= days_in_month(year, month) as u32 {
            days -= days_in_month(year, month) as u32;
            month += 1;
        }
        (year, month, days as u8 + 1)
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000)); // Divisible by 400
        assert!(is_leap_year(2024)); // Divisible by 4
        assert!(!is_leap_year(1900)); // Divisible by 100, not 400
        assert!(!is_leap_year(2023)); // Not divisible by 4
        assert!(!is_leap_year(2100)); // Divisible by 100, not 400
    }

    #[test]
    fn test_unix_epoch() {
        let dt = to_calendar(0, HourFormat::TwentyFourHour);
        assert_eq!(dt.year, 1970);
        assert_eq!(dt.month, 1);
        assert_eq!(dt.day, 1);
        assert_eq!(dt.hour, 0);
        assert_eq!(dt.minute, 0);
        assert_eq!(dt.second, 0);
        assert_eq!(dt.weekday, Weekday::Thursday);
        assert_eq!(dt.period, Period::None);
        assert_eq!(dt.status, SyncStatus::NoData);
    }

    #[test]
    fn test_second_day() {
        let dt = to_calendar(86_400, HourFormat::TwentyFourHour);
        assert_eq!((dt.year, dt.month, dt.day), (1970, 1, 2));
        assert_eq!(dt.weekday, Weekday::Friday);
        assert_eq!(dt.weekday.number(), 6);
    }

    #[test]
    fn test_sunday_is_one() {
        // 1970-01-04 was a Sunday
        let dt = to_calendar(3 * 86_400, HourFormat::TwentyFourHour);
        assert_eq!(dt.weekday, Weekday::Sunday);
        assert_eq!(dt.weekday.number(), 1);
    }

    #[test]
    fn test_leap_day_2000() {
        // 2000-02-29 12:00:00
        let dt = to_calendar(951_825_600, HourFormat::TwentyFourHour);
        assert_eq!((dt.year, dt.month, dt.day), (2000, 2, 29));
        assert_eq!(dt.weekday, Weekday::Tuesday);
        let next = to_calendar(951_825_600 + 86_400, HourFormat::TwentyFourHour);
        assert_eq!((next.month, next.day), (3, 1));
    }

    #[test]
    fn test_no_leap_day_2100() {
        // 2100-02-28 00:00:00 is followed by March 1st
        let feb28 = unix_from_civil(2100, 2, 28, 0, 0, 0).unwrap();
        let dt = to_calendar(feb28 + 86_400, HourFormat::TwentyFourHour);
        assert_eq!((dt.year, dt.month, dt.day), (2100, 3, 1));
        assert_eq!(unix_from_civil(2100, 2, 29, 0, 0, 0), None);
    }

    #[test]
    fn test_end_of_range() {
        let dt = to_calendar(u32::MAX, HourFormat::TwentyFourHour);
        assert_eq!((dt.year, dt.month, dt.day), (2106, 2, 7));
        assert_eq!((dt.hour, dt.minute, dt.second), (6, 28, 15));
        assert_eq!(dt.weekday, Weekday::Sunday);
    }

    #[test]
    fn test_matches_year_walk() {
        let samples = [
            0u32,
            68_169_599, // 1972-02-28 23:59:59
            946_684_799,
            946_684_800,
            1_700_000_000,
            2_147_483_647,
            4_102_444_800,
            u32::MAX,
        ];
        for &unix_secs in &samples {
            let dt = to_calendar(unix_secs, HourFormat::TwentyFourHour);
            assert_eq!(
                (dt.year, dt.month, dt.day),
                walk_calendar(unix_secs),
                "mismatch for {}",
                unix_secs
            );
        }
    }

    #[test]
    fn test_round_trip_conversion() {
        let test_dates = [
            0u32,       // 1970-01-01 00:00:00
            946684800,  // 2000-01-01 00:00:00
            1609459200, // 2021-01-01 00:00:00
            1704067200, // 2024-01-01 00:00:00
            2147483647, // 2038-01-19 03:14:07
            4102444800, // 2100-01-01 00:00:00
        ];

        for &unix_secs in &test_dates {
            let dt = to_calendar(unix_secs, HourFormat::TwentyFourHour);
            let converted_back =
                unix_from_civil(dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second);
            assert_eq!(
                Some(unix_secs),
                converted_back,
                "Round trip failed for timestamp {}",
                unix_secs
            );
        }
    }

    #[test]
    fn test_twelve_hour_format() {
        let midnight = unix_from_civil(2024, 6, 1, 0, 5, 0).unwrap();
        let dt = to_calendar(midnight, HourFormat::TwelveHour);
        assert_eq!((dt.hour, dt.period), (0, Period::Am));

        let noon = unix_from_civil(2024, 6, 1, 12, 0, 0).unwrap();
        let dt = to_calendar(noon, HourFormat::TwelveHour);
        assert_eq!((dt.hour, dt.period), (12, Period::Pm));

        let evening = unix_from_civil(2024, 6, 1, 23, 59, 59).unwrap();
        let dt = to_calendar(evening, HourFormat::TwelveHour);
        assert_eq!((dt.hour, dt.period), (11, Period::Pm));

        let dt = to_calendar(evening, HourFormat::TwentyFourHour);
        assert_eq!((dt.hour, dt.period), (23, Period::None));
    }

    #[test]
    fn test_out_of_range_civil() {
        assert_eq!(unix_from_civil(1969, 12, 31, 23, 59, 59), None);
        assert_eq!(unix_from_civil(2024, 13, 1, 0, 0, 0), None);
        assert_eq!(unix_from_civil(2024, 4, 31, 0, 0, 0), None);
        assert_eq!(unix_from_civil(2024, 4, 30, 24, 0, 0), None);
        assert_eq!(unix_from_civil(2106, 2, 7, 6, 28, 16), None);
    }

    #[test]
    fn test_display() {
        use std::string::ToString;

        let dt = to_calendar(0, HourFormat::TwentyFourHour);
        assert_eq!(dt.to_string(), "Thursday, 1 January 1970 00:00:00");

        let ts = unix_from_civil(2023, 3, 26, 15, 4, 5).unwrap();
        let dt = to_calendar(ts, HourFormat::TwelveHour);
        assert_eq!(dt.to_string(), "Sunday, 26 March 2023 03:04:05 PM");
    }
}
