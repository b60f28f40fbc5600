//! Datagram transport capability
//!
//! The sync state machine only ever needs four things from a network stack:
//! bind a local port, send one datagram to a named host, check whether a
//! reply is waiting, and copy that reply out. None of these may block.

/// Datagram transport operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Failed to bind socket to local port
    BindFailed,
    /// Failed to send data
    SendFailed,
    /// Failed to receive data
    ReceiveFailed,
    /// Host name could not be mapped to an address
    Unresolved,
    /// Caller buffer cannot hold the pending datagram header
    BufferTooSmall,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BindFailed => write!(f, "Socket bind failed"),
            Self::SendFailed => write!(f, "Datagram send failed"),
            Self::ReceiveFailed => write!(f, "Datagram receive failed"),
            Self::Unresolved => write!(f, "Host name not resolved"),
            Self::BufferTooSmall => write!(f, "Receive buffer too small"),
        }
    }
}

impl core::error::Error for TransportError {}

impl embedded_io::Error for TransportError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::BindFailed => embedded_io::ErrorKind::AddrInUse,
            Self::SendFailed | Self::ReceiveFailed => embedded_io::ErrorKind::BrokenPipe,
            Self::Unresolved => embedded_io::ErrorKind::NotFound,
            Self::BufferTooSmall => embedded_io::ErrorKind::InvalidInput,
        }
    }
}

/// Non-blocking UDP-like socket
///
/// Implementations must return immediately from every method. A transport
/// that needs DNS resolves names itself; callers pass the host name exactly
/// as configured.
pub trait DatagramTransport {
    /// Open the socket on `local_port` (0 lets the stack choose)
    fn bind(&mut self, local_port: u16) -> Result<(), TransportError>;

    /// Queue one datagram for `host:port`
    fn send_to(&mut self, host: &str, port: u16, payload: &[u8]) -> Result<(), TransportError>;

    /// Length of the next pending datagram, or `None` if nothing has arrived
    fn poll_datagram(&mut self) -> Result<Option<usize>, TransportError>;

    /// Copy the pending datagram into `buf`, consuming it
    ///
    /// Bytes beyond `buf.len()` are discarded. Returns the number of bytes
    /// written.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

impl<T: DatagramTransport + ?Sized> DatagramTransport for &mut T {
    fn bind(&mut self, local_port: u16) -> Result<(), TransportError> {
        (**self).bind(local_port)
    }

    fn send_to(&mut self, host: &str, port: u16, payload: &[u8]) -> Result<(), TransportError> {
        (**self).send_to(host, port, payload)
    }

    fn poll_datagram(&mut self) -> Result<Option<usize>, TransportError> {
        (**self).poll_datagram()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).read(buf)
    }
}
