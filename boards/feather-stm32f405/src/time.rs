#![deny(unsafe_code)]
#![deny(warnings)]
//! Millisecond clock for the NTP session

use embassy_time::Instant;
use hal_abstractions::MonotonicClock;

/// `MonotonicClock` backed by the embassy-time driver (TIM2 on this board)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Wraps after ~49 days; the session measures intervals with wrapping_sub
        Instant::now().as_millis() as u32
    }
}
