//! Hosted transport and clock for desktop builds and integration tests

use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Instant;

use crate::clock::MonotonicClock;
use crate::network::{DatagramTransport, TransportError};

/// Scratch space for peeking at a pending datagram's length
const PEEK_BUFFER_SIZE: usize = 512;

/// Non-blocking `std::net::UdpSocket` transport
///
/// Host names are resolved on every send with `ToSocketAddrs`; only IPv4
/// results are used since the socket is bound to `0.0.0.0`.
#[derive(Debug, Default)]
pub struct StdUdpTransport {
    socket: Option<UdpSocket>,
}

impl StdUdpTransport {
    /// Create an unbound transport
    pub fn new() -> Self {
        Self { socket: None }
    }

    /// Local address once bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    fn socket(&self) -> Result<&UdpSocket, TransportError> {
        self.socket.as_ref().ok_or(TransportError::BindFailed)
    }
}

impl DatagramTransport for StdUdpTransport {
    fn bind(&mut self, local_port: u16) -> Result<(), TransportError> {
        let socket =
            UdpSocket::bind(("0.0.0.0", local_port)).map_err(|_| TransportError::BindFailed)?;
        socket
            .set_nonblocking(true)
            .map_err(|_| TransportError::BindFailed)?;
        self.socket = Some(socket);
        Ok(())
    }

    fn send_to(&mut self, host: &str, port: u16, payload: &[u8]) -> Result<(), TransportError> {
        let remote = (host, port)
            .to_socket_addrs()
            .map_err(|_| TransportError::Unresolved)?
            .find(SocketAddr::is_ipv4)
            .ok_or(TransportError::Unresolved)?;
        self.socket()?
            .send_to(payload, remote)
            .map_err(|_| TransportError::SendFailed)?;
        Ok(())
    }

    fn poll_datagram(&mut self) -> Result<Option<usize>, TransportError> {
        let mut scratch = [0u8; PEEK_BUFFER_SIZE];
        match self.socket()?.peek_from(&mut scratch) {
            Ok((len, _)) => Ok(Some(len)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(_) => Err(TransportError::ReceiveFailed),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.socket()?.recv_from(buf) {
            Ok((len, _)) => Ok(len),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => Err(TransportError::ReceiveFailed),
        }
    }
}

/// Millisecond clock counting from construction
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for StdClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap the trait contract allows for
        self.origin.elapsed().as_millis() as u32
    }
}
