//! Sync session configuration

use core::fmt;

use hal_abstractions::MAX_HOST_NAME_LEN;
use heapless::String;

use crate::packet::NTP_PORT;

/// Longest server host name kept in the session
pub const MAX_SERVER_NAME_LEN: usize = MAX_HOST_NAME_LEN;

/// Minimum time between two requests
pub const MIN_SEND_INTERVAL_SECS: u32 = 10;

/// Maximum time to wait for a reply
pub const MAX_RECEIVE_TIMEOUT_SECS: u32 = 60;

const DEFAULT_SERVER: &str = "pool.ntp.org";
const DEFAULT_LOCAL_PORT: u16 = 1337;
const DEFAULT_SEND_INTERVAL_SECS: u32 = MIN_SEND_INTERVAL_SECS;
const DEFAULT_RECEIVE_TIMEOUT_SECS: u32 = 1;
const MS_PER_SEC: u32 = 1000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Send interval below the 10 s floor
    SendIntervalTooShort,
    /// Receive timeout above the 60 s ceiling
    ReceiveTimeoutTooLong,
    /// Server host name longer than `MAX_SERVER_NAME_LEN`
    ServerNameTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendIntervalTooShort => write!(
                f,
                "Send interval must be at least {} s",
                MIN_SEND_INTERVAL_SECS
            ),
            Self::ReceiveTimeoutTooLong => write!(
                f,
                "Receive timeout must be at most {} s",
                MAX_RECEIVE_TIMEOUT_SECS
            ),
            Self::ServerNameTooLong => write!(
                f,
                "Server name exceeds {} bytes",
                MAX_SERVER_NAME_LEN
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

/// SNTP session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// NTP server host name or address literal
    pub server: String<MAX_SERVER_NAME_LEN>,
    /// Server UDP port
    pub server_port: u16,
    /// Local UDP port the request socket binds to
    pub local_port: u16,
    send_interval_ms: u32,
    receive_timeout_ms: u32,
}

impl SyncConfig {
    /// Default configuration pointed at `server`
    pub fn new(server: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_server(server)?;
        Ok(config)
    }

    pub fn set_server(&mut self, server: &str) -> Result<(), ConfigError> {
        let mut name = String::new();
        name.push_str(server)
            .map_err(|_| ConfigError::ServerNameTooLong)?;
        self.server = name;
        Ok(())
    }

    /// Set the minimum time between requests; rejects values under 10 s
    pub fn set_send_interval(&mut self, seconds: u32) -> Result<(), ConfigError> {
        if seconds < MIN_SEND_INTERVAL_SECS {
            return Err(ConfigError::SendIntervalTooShort);
        }
        self.send_interval_ms = seconds.saturating_mul(MS_PER_SEC);
        Ok(())
    }

    /// Set how long to wait for a reply; rejects values over 60 s
    pub fn set_receive_timeout(&mut self, seconds: u32) -> Result<(), ConfigError> {
        if seconds > MAX_RECEIVE_TIMEOUT_SECS {
            return Err(ConfigError::ReceiveTimeoutTooLong);
        }
        self.receive_timeout_ms = seconds * MS_PER_SEC;
        Ok(())
    }

    pub fn send_interval_ms(&self) -> u32 {
        self.send_interval_ms
    }

    pub fn receive_timeout_ms(&self) -> u32 {
        self.receive_timeout_ms
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        let mut server = String::new();
        // The default name is well under the capacity
        let _ = server.push_str(DEFAULT_SERVER);
        Self {
            server,
            server_port: NTP_PORT,
            local_port: DEFAULT_LOCAL_PORT,
            send_interval_ms: DEFAULT_SEND_INTERVAL_SECS * MS_PER_SEC,
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_SECS * MS_PER_SEC,
        }
    }
}
