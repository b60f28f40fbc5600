#![deny(unsafe_code)]
#![deny(warnings)]
//! Network and clock configuration structures

use ntptime_core::{DstRule, HourFormat, LocalZone};

/// Network stack configuration
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// MAC address for Ethernet
    pub mac_addr: [u8; 6],
    /// Random seed for network stack
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mac_addr: [0x02, 0x00, 0x00, 0x12, 0x34, 0x56],
            seed: 0x1234_5678_u64,
        }
    }
}

/// Wall clock configuration
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// NTP server host name or dotted IPv4 literal
    pub server: &'static str,
    /// Seconds between NTP requests (at least 10)
    pub send_interval_secs: u32,
    /// Seconds to wait for a reply (at most 60)
    pub receive_timeout_secs: u32,
    /// How local time is derived from UTC
    pub zone: LocalZone,
    /// Delay between two session polls
    pub poll_period_ms: u64,
    /// Delay before retrying a failed DNS lookup
    pub dns_retry_ms: u64,
    /// Consecutive timeouts before the server name is looked up again
    pub timeouts_before_resolve: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            server: "pool.ntp.org",
            send_interval_secs: 60,
            receive_timeout_secs: 2,
            // Central European Time
            zone: LocalZone::new(1.0, DstRule::European, HourFormat::TwentyFourHour),
            poll_period_ms: 100,
            dns_retry_ms: 5000,
            timeouts_before_resolve: 3,
        }
    }
}
