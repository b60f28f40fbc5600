//! Daylight saving time rules
//!
//! Both rules look at the calendar fields of the timestamp they are given.
//! Callers pass the timestamp after the standard-time offset has been
//! applied, so boundary hours compare against local standard time.
#![deny(unsafe_code)]

use crate::calendar::{to_calendar, HourFormat, Weekday};

/// Which DST rule set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DstRule {
    /// Standard time all year
    #[default]
    None = 0,
    /// Last Sunday of March to last Sunday of October
    European = 1,
    /// Second Sunday of March to first Sunday of November, 02:00 local
    UnitedStates = 2,
}

impl DstRule {
    /// Whether the rule adds an hour at `local_standard` seconds
    pub fn is_active(self, local_standard: u32) -> bool {
        match self {
            Self::None => false,
            Self::European => european_dst(local_standard),
            Self::UnitedStates => us_dst(local_standard),
        }
    }
}

impl From<u8> for DstRule {
    /// Unknown codes fall back to no DST
    fn from(code: u8) -> Self {
        match code {
            1 => Self::European,
            2 => Self::UnitedStates,
            _ => Self::None,
        }
    }
}

/// Day of month of the last Sunday, for March (`k = 4`) or October (`k = 1`)
///
/// Valid for years 1900-2099 where the Gregorian correction is constant.
fn last_sunday(year: i32, k: i32) -> i32 {
    31 - (5 * year / 4 + k) % 7
}

/// Central European summer time
///
/// The switch happens at 03:00 on the last Sunday of March and of October
/// in terms of the timestamp's own hour field.
pub fn european_dst(timestamp: u32) -> bool {
    let dt = to_calendar(timestamp, HourFormat::TwentyFourHour);
    let year = dt.year as i32;
    let hours_into_month = dt.hour as i32 + 24 * dt.day as i32;

    match dt.month {
        1 | 2 | 11 | 12 => false,
        4..=9 => true,
        3 => hours_into_month >= 3 + 24 * last_sunday(year, 4),
        _ => hours_into_month < 3 + 24 * last_sunday(year, 1),
    }
}

/// United States daylight time (rules in force since 2007)
pub fn us_dst(timestamp: u32) -> bool {
    let dt = to_calendar(timestamp, HourFormat::TwentyFourHour);
    let is_sunday = dt.weekday == Weekday::Sunday;
    let day = dt.day as i32;
    // Day of month of the most recent Sunday, <= 0 if none yet this month
    let previous_sunday = day - (dt.weekday.number() as i32 - 1);

    match dt.month {
        1 | 2 | 12 => false,
        4..=10 => true,
        3 => {
            // Second Sunday has happened once the previous Sunday is the 8th or later
            previous_sunday >= 8 && (day > 14 || !is_sunday || dt.hour >= 2)
        }
        _ => {
            if previous_sunday < 1 {
                // Before the first Sunday of November
                !is_sunday || dt.hour < 2
            } else {
                day < 8 && is_sunday && dt.hour < 2
            }
        }
    }
}
