//! Result status codes shared with callers

use core::fmt;

/// Outcome of a conversion or poll
///
/// The numeric codes are part of the public contract: callers branch on
/// `0`, `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SyncStatus {
    /// Nothing to report yet; keep polling
    #[default]
    NoData = 0,
    /// Calendar fields hold a synchronized local time
    Valid = 1,
    /// The server did not answer within the receive timeout
    HostTimeout = 2,
}

impl SyncStatus {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<SyncStatus> for u8 {
    fn from(status: SyncStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for SyncStatus {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NoData),
            1 => Ok(Self::Valid),
            2 => Ok(Self::HostTimeout),
            other => Err(other),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No data"),
            Self::Valid => write!(f, "Valid"),
            Self::HostTimeout => write!(f, "Host timeout"),
        }
    }
}
