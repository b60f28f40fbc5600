//! Platform-agnostic SNTP time sync for embedded targets
//!
//! Fetches the current time from an NTP server over any
//! [`DatagramTransport`](hal_abstractions::DatagramTransport), applies a fixed
//! UTC offset plus an optional European or US daylight-saving rule, and
//! breaks the result into calendar fields. It has NO hardware dependencies.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the modules below
mod fmt;

pub mod calendar;
pub mod config;
pub mod dst;
pub mod packet;
pub mod status;
pub mod sync;
pub mod zone;

pub use calendar::{to_calendar, unix_from_civil, CalendarTime, HourFormat, Period, Weekday};
pub use config::{ConfigError, SyncConfig};
pub use dst::DstRule;
pub use status::SyncStatus;
pub use sync::{SntpSession, SyncPhase, TimeoutStreak};
pub use zone::{adjust_time_zone, LocalZone};
