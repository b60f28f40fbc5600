//! SNTP wire format
//!
//! Only the parts this client uses: a fixed client request and the transmit
//! timestamp seconds of the server reply.

/// Request and response size in bytes
pub const PACKET_SIZE: usize = 48;

/// NTP epoch offset (1900-01-01 to 1970-01-01 in seconds)
pub const NTP_UNIX_OFFSET: u32 = 2_208_988_800;

/// SNTP port (UDP 123)
pub const NTP_PORT: u16 = 123;

/// LI = 3 (unsynchronized), VN = 4, Mode = 3 (client)
const LI_VN_MODE: u8 = 0b1110_0011;
const STRATUM: u8 = 0;
const POLL_INTERVAL: u8 = 6;
const PRECISION: u8 = 0xEC;
const REFERENCE_ID: [u8; 4] = [49, 0x4E, 49, 52];

/// Offset of the transmit timestamp seconds field
const TRANSMIT_SECS_OFFSET: usize = 40;

/// Zero `buf` and fill in a client request
pub fn write_request(buf: &mut [u8; PACKET_SIZE]) {
    buf.fill(0);
    buf[0] = LI_VN_MODE;
    buf[1] = STRATUM;
    buf[2] = POLL_INTERVAL;
    buf[3] = PRECISION;
    buf[12..16].copy_from_slice(&REFERENCE_ID);
}

/// Transmit timestamp seconds (since 1900) from a server reply
pub fn transmit_seconds(response: &[u8; PACKET_SIZE]) -> u32 {
    u32::from_be_bytes([
        response[TRANSMIT_SECS_OFFSET],
        response[TRANSMIT_SECS_OFFSET + 1],
        response[TRANSMIT_SECS_OFFSET + 2],
        response[TRANSMIT_SECS_OFFSET + 3],
    ])
}

/// Convert NTP seconds to Unix seconds
///
/// Instants at or before the Unix epoch carry no usable time and yield `None`.
pub fn ntp_to_unix(ntp_secs: u32) -> Option<u32> {
    ntp_secs
        .checked_sub(NTP_UNIX_OFFSET)
        .filter(|&unix_secs| unix_secs > 0)
}
