//! Non-blocking SNTP session
//!
//! A session alternates between two phases. In `AwaitingSend` it fires one
//! request, at most once per send interval. In `AwaitingReceive` it checks
//! for the reply on every poll and gives up once the receive timeout has
//! passed. Each call does a bounded amount of work and returns; the caller's
//! loop supplies the scheduling.
//!
//! ## Usage
//! ```ignore
//! let mut session = SntpSession::new("pool.ntp.org", transport, clock)?;
//! let zone = LocalZone::new(1.0, DstRule::European, HourFormat::TwentyFourHour);
//! loop {
//!     let now = session.poll(&zone, None);
//!     match now.status {
//!         SyncStatus::Valid => display(&now),
//!         SyncStatus::HostTimeout => warn_user(),
//!         SyncStatus::NoData => {}
//!     }
//!     do_other_work();
//! }
//! ```
#![deny(unsafe_code)]

use core::num::NonZeroU32;

use hal_abstractions::{DatagramTransport, MonotonicClock};

use crate::calendar::CalendarTime;
use crate::config::{ConfigError, SyncConfig};
use crate::packet::{self, PACKET_SIZE};
use crate::status::SyncStatus;
use crate::zone::LocalZone;

/// Where the request/response exchange currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPhase {
    /// Ready to send; `last_sent_ms` rate-limits the next request
    AwaitingSend { last_sent_ms: Option<u32> },
    /// Request sent at `sent_at_ms`, reply pending
    AwaitingReceive { sent_at_ms: u32 },
}

/// One SNTP client bound to one server
///
/// Owns its transport, clock and packet buffer, so several sessions can run
/// side by side against different servers.
pub struct SntpSession<T, C> {
    config: SyncConfig,
    transport: T,
    clock: C,
    phase: SyncPhase,
    bound: bool,
    buffer: [u8; PACKET_SIZE],
}

impl<T: DatagramTransport, C: MonotonicClock> SntpSession<T, C> {
    /// Create a session for `server` with default intervals
    pub fn new(server: &str, transport: T, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::with_config(SyncConfig::new(server)?, transport, clock))
    }

    /// Create a session with custom configuration
    pub fn with_config(config: SyncConfig, transport: T, clock: C) -> Self {
        Self {
            config,
            transport,
            clock,
            phase: SyncPhase::AwaitingSend { last_sent_ms: None },
            bound: false,
            buffer: [0; PACKET_SIZE],
        }
    }

    /// Advance the exchange by one step
    ///
    /// With `override_timestamp` set the network is skipped entirely and
    /// that UTC value is localised instead. Otherwise the result is `Valid`
    /// only on the poll that consumes a good reply.
    pub fn poll(
        &mut self,
        zone: &LocalZone,
        override_timestamp: Option<NonZeroU32>,
    ) -> CalendarTime {
        if let Some(utc) = override_timestamp {
            return zone.localize(utc.get());
        }

        match self.phase {
            SyncPhase::AwaitingSend { last_sent_ms } => self.send_request(last_sent_ms),
            SyncPhase::AwaitingReceive { sent_at_ms } => self.check_response(zone, sent_at_ms),
        }
    }

    fn send_request(&mut self, last_sent_ms: Option<u32>) -> CalendarTime {
        let now = self.clock.now_ms();
        if let Some(last) = last_sent_ms {
            if now.wrapping_sub(last) < self.config.send_interval_ms() {
                return CalendarTime::default();
            }
        }

        match self.transmit() {
            Ok(()) => debug!(
                "Sent NTP request to {}:{}",
                self.config.server.as_str(),
                self.config.server_port
            ),
            // No reply can arrive; the receive timeout reports it
            Err(e) => warn!(
                "SNTP request to {} failed: {}",
                self.config.server.as_str(),
                e
            ),
        }
        self.phase = SyncPhase::AwaitingReceive { sent_at_ms: now };
        CalendarTime::default()
    }

    fn transmit(&mut self) -> Result<(), hal_abstractions::TransportError> {
        if !self.bound {
            self.transport.bind(self.config.local_port)?;
            self.bound = true;
        }
        packet::write_request(&mut self.buffer);
        self.transport.send_to(
            self.config.server.as_str(),
            self.config.server_port,
            &self.buffer,
        )
    }

    fn check_response(&mut self, zone: &LocalZone, sent_at_ms: u32) -> CalendarTime {
        let pending = match self.transport.poll_datagram() {
            Ok(pending) => pending,
            Err(e) => {
                trace!("Datagram check failed: {}", e);
                None
            }
        };

        let Some(pending_len) = pending else {
            let waited = self.clock.elapsed_since(sent_at_ms);
            if waited > self.config.receive_timeout_ms() {
                warn!(
                    "No reply from {} after {} ms",
                    self.config.server.as_str(),
                    waited
                );
                self.phase = SyncPhase::AwaitingSend { last_sent_ms: None };
                return CalendarTime::default().with_status(SyncStatus::HostTimeout);
            }
            return CalendarTime::default();
        };

        debug!("NTP packet received, length={}", pending_len);
        self.phase = SyncPhase::AwaitingSend {
            last_sent_ms: Some(sent_at_ms),
        };

        self.buffer.fill(0);
        let read_len = match self.transport.read(&mut self.buffer) {
            Ok(len) => len,
            Err(e) => {
                warn!("Reading NTP reply failed: {}", e);
                return CalendarTime::default();
            }
        };
        if read_len < PACKET_SIZE {
            warn!("Short NTP reply: {} bytes", read_len);
            return CalendarTime::default();
        }

        let ntp_secs = packet::transmit_seconds(&self.buffer);
        match packet::ntp_to_unix(ntp_secs) {
            Some(unix_secs) => {
                info!("NTP timestamp: {} UTC", unix_secs);
                zone.localize(unix_secs)
            }
            None => {
                warn!("NTP reply carries no usable time ({})", ntp_secs);
                CalendarTime::default()
            }
        }
    }

    /// Set the minimum time between requests; rejects values under 10 s
    pub fn set_send_interval(&mut self, seconds: u32) -> Result<(), ConfigError> {
        self.config.set_send_interval(seconds)
    }

    /// Set how long to wait for a reply; rejects values over 60 s
    pub fn set_receive_timeout(&mut self, seconds: u32) -> Result<(), ConfigError> {
        self.config.set_receive_timeout(seconds)
    }
}

impl<T, C> SntpSession<T, C> {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn send_interval_ms(&self) -> u32 {
        self.config.send_interval_ms()
    }

    pub fn receive_timeout_ms(&self) -> u32 {
        self.config.receive_timeout_ms()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give back the transport and clock
    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock)
    }
}

/// Counts `HostTimeout` results in a row
///
/// Lets a caller act on a server that has stopped answering, e.g. look its
/// address up again. Any `Valid` result starts the count over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeoutStreak {
    limit: u8,
    count: u8,
}

impl TimeoutStreak {
    /// Trip after `limit` consecutive timeouts (at least one)
    pub const fn new(limit: u8) -> Self {
        Self {
            limit: if limit == 0 { 1 } else { limit },
            count: 0,
        }
    }

    /// Feed one poll result; `true` when the limit has just been reached
    ///
    /// The count restarts after tripping, so a server that stays silent
    /// trips the streak again every `limit` timeouts.
    pub fn record(&mut self, status: SyncStatus) -> bool {
        match status {
            SyncStatus::Valid => self.count = 0,
            SyncStatus::NoData => {}
            SyncStatus::HostTimeout => {
                self.count += 1;
                if self.count >= self.limit {
                    self.count = 0;
                    return true;
                }
            }
        }
        false
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}
