//! Fixed-offset time zone with optional DST rule

use crate::calendar::{to_calendar, CalendarTime, HourFormat};
use crate::dst::DstRule;
use crate::status::SyncStatus;

/// Seconds added when a DST rule is active
const DST_SHIFT_SECS: u32 = 3600;

/// Localisation settings applied to every converted timestamp
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalZone {
    /// Standard-time offset from UTC in hours, fractional offsets allowed
    pub utc_offset_hours: f32,
    pub dst: DstRule,
    pub hour_format: HourFormat,
}

impl LocalZone {
    pub const fn new(utc_offset_hours: f32, dst: DstRule, hour_format: HourFormat) -> Self {
        Self {
            utc_offset_hours,
            dst,
            hour_format,
        }
    }

    /// UTC, no DST, 24-hour display
    pub const fn utc() -> Self {
        Self::new(0.0, DstRule::None, HourFormat::TwentyFourHour)
    }

    /// Local wall-clock seconds for `utc`
    pub fn adjust(&self, utc: u32) -> u32 {
        adjust_time_zone(utc, self.utc_offset_hours, self.dst)
    }

    /// Adjust and convert a known-good UTC timestamp, marked `Valid`
    pub fn localize(&self, utc: u32) -> CalendarTime {
        to_calendar(self.adjust(utc), self.hour_format).with_status(SyncStatus::Valid)
    }
}

/// Apply a UTC offset and DST rule to `utc`
///
/// The offset in seconds is truncated toward zero. The DST rule is evaluated
/// on the offset-adjusted value, i.e. against local standard time. Results
/// wrap within `u32` rather than saturate.
pub fn adjust_time_zone(utc: u32, offset_hours: f32, dst: DstRule) -> u32 {
    let offset_secs = (offset_hours * 3600.0) as i32;
    let local_standard = utc.wrapping_add_signed(offset_secs);
    if dst.is_active(local_standard) {
        local_standard.wrapping_add(DST_SHIFT_SECS)
    } else {
        local_standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{unix_from_civil, Period};

    fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> u32 {
        unix_from_civil(year, month, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_plain_offsets() {
        let t = utc(2024, 1, 10, 12, 0);
        assert_eq!(adjust_time_zone(t, 0.0, DstRule::None), t);
        assert_eq!(adjust_time_zone(t, 1.0, DstRule::None), t + 3600);
        assert_eq!(adjust_time_zone(t, -5.0, DstRule::None), t - 5 * 3600);
        assert_eq!(adjust_time_zone(t, 5.5, DstRule::None), t + 19_800);
        assert_eq!(adjust_time_zone(t, -3.5, DstRule::None), t - 12_600);
    }

    #[test]
    fn test_european_spring_forward_with_offset() {
        // Central Europe: UTC+1, last Sunday of March 2023 is the 26th
        let before = utc(2023, 3, 26, 1, 0);
        assert_eq!(adjust_time_zone(before, 1.0, DstRule::European), before + 3600);

        let after = utc(2023, 3, 26, 2, 0);
        assert_eq!(
            adjust_time_zone(after, 1.0, DstRule::European),
            after + 2 * 3600
        );
    }

    #[test]
    fn test_us_transitions_at_two_local() {
        // US Eastern: UTC-5
        let spring = utc(2023, 3, 12, 7, 0); // 02:00 EST
        let local = LocalZone::new(-5.0, DstRule::UnitedStates, HourFormat::TwentyFourHour)
            .localize(spring);
        assert_eq!((local.day, local.hour), (12, 3));

        let just_before = utc(2023, 3, 12, 6, 59);
        let local = LocalZone::new(-5.0, DstRule::UnitedStates, HourFormat::TwentyFourHour)
            .localize(just_before);
        assert_eq!((local.hour, local.minute), (1, 59));

        let fall = utc(2023, 11, 5, 7, 0); // 02:00 EST
        let local = LocalZone::new(-5.0, DstRule::UnitedStates, HourFormat::TwentyFourHour)
            .localize(fall);
        assert_eq!((local.day, local.hour), (5, 2));

        let still_summer = utc(2023, 11, 5, 6, 0); // 01:00 EST
        let local = LocalZone::new(-5.0, DstRule::UnitedStates, HourFormat::TwentyFourHour)
            .localize(still_summer);
        assert_eq!((local.day, local.hour), (5, 2));
    }

    #[test]
    fn test_out_of_range_rule_code_is_no_dst() {
        let t = utc(2023, 7, 1, 12, 0);
        assert_eq!(adjust_time_zone(t, 1.0, DstRule::from(9)), t + 3600);
    }

    #[test]
    fn test_localize_marks_valid() {
        let zone = LocalZone::new(2.0, DstRule::European, HourFormat::TwelveHour);
        let dt = zone.localize(utc(2023, 7, 1, 12, 30));
        assert_eq!(dt.status, SyncStatus::Valid);
        // 12:30 UTC + 2h + 1h DST = 15:30
        assert_eq!((dt.hour, dt.minute, dt.period), (3, 30, Period::Pm));
    }

    #[test]
    fn test_twelve_hour_does_not_move_dst_boundary() {
        // 13:00 local standard on the March switch day is past 03:00 either way
        let t = utc(2023, 3, 26, 12, 0);
        let twelve = LocalZone::new(1.0, DstRule::European, HourFormat::TwelveHour).localize(t);
        let twenty_four =
            LocalZone::new(1.0, DstRule::European, HourFormat::TwentyFourHour).localize(t);
        assert_eq!(twelve.hour, 2);
        assert_eq!(twenty_four.hour, 14);
    }

    #[test]
    fn test_utc_zone() {
        let dt = LocalZone::utc().localize(0);
        assert_eq!((dt.year, dt.month, dt.day, dt.hour), (1970, 1, 1, 0));
        assert!(dt.is_valid());
    }
}
