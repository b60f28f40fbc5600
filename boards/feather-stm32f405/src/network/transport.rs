#![deny(unsafe_code)]
#![deny(warnings)]
//! Non-blocking UDP transport over the embassy-net stack
//!
//! The NTP session polls instead of awaiting, so every socket call goes
//! through embassy-net's `poll_*` methods with a no-op waker. A reply found
//! by `poll_datagram` is staged in a local buffer until `read` collects it.
//!
//! DNS is asynchronous in embassy-net and cannot run inside a poll, so the
//! server name is resolved up front with [`EthernetUdpTransport::resolve`].
//! The caller drops the cached address with [`EthernetUdpTransport::forget`]
//! when the server stops answering and resolves again.

use core::net::Ipv4Addr;
use core::task::{Context, Poll, Waker};

use defmt::{info, warn, Debug2Format};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Stack};
use hal_abstractions::{DatagramTransport, HostCache, TransportError};

/// Largest datagram kept; NTP replies carrying a MAC fit
pub const STAGING_SIZE: usize = 68;

/// Socket buffers, owned by the caller so they can live in the task frame
pub struct UdpBuffers {
    pub rx_meta: [PacketMetadata; 2],
    pub rx: [u8; 128],
    pub tx_meta: [PacketMetadata; 2],
    pub tx: [u8; 128],
}

impl UdpBuffers {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; 2],
            rx: [0; 128],
            tx_meta: [PacketMetadata::EMPTY; 2],
            tx: [0; 128],
        }
    }
}

/// `DatagramTransport` backed by an embassy-net `UdpSocket`
pub struct EthernetUdpTransport<'a> {
    stack: Stack<'a>,
    socket: UdpSocket<'a>,
    resolved: HostCache<IpAddress>,
    staged: [u8; STAGING_SIZE],
    staged_len: Option<usize>,
}

impl<'a> EthernetUdpTransport<'a> {
    pub fn new(stack: Stack<'a>, buffers: &'a mut UdpBuffers) -> Self {
        let socket = UdpSocket::new(
            stack,
            &mut buffers.rx_meta,
            &mut buffers.rx,
            &mut buffers.tx_meta,
            &mut buffers.tx,
        );
        Self {
            stack,
            socket,
            resolved: HostCache::new(),
            staged: [0; STAGING_SIZE],
            staged_len: None,
        }
    }

    /// Look up `host` and remember its first IPv4 address
    pub async fn resolve(&mut self, host: &str) -> Result<IpAddress, TransportError> {
        if let Ok(literal) = host.parse::<Ipv4Addr>() {
            return Ok(IpAddress::Ipv4(literal));
        }

        let address = self
            .stack
            .dns_query(host, DnsQueryType::A)
            .await
            .map_err(|_| TransportError::Unresolved)?
            .first()
            .copied()
            .ok_or(TransportError::Unresolved)?;

        self.resolved.store(host, address)?;
        info!("Resolved {} to {}", host, Debug2Format(&address));
        Ok(address)
    }

    fn address_of(&self, host: &str) -> Result<IpAddress, TransportError> {
        if let Ok(literal) = host.parse::<Ipv4Addr>() {
            return Ok(IpAddress::Ipv4(literal));
        }
        self.resolved.lookup(host).ok_or(TransportError::Unresolved)
    }

    /// Drop the cached server address; sends fail until `resolve` succeeds
    pub fn forget(&mut self) {
        if !self.resolved.is_empty() {
            info!("Dropping cached server address");
        }
        self.resolved.forget();
    }
}

impl DatagramTransport for EthernetUdpTransport<'_> {
    fn bind(&mut self, local_port: u16) -> Result<(), TransportError> {
        self.socket
            .bind(local_port)
            .map_err(|_| TransportError::BindFailed)
    }

    fn send_to(&mut self, host: &str, port: u16, payload: &[u8]) -> Result<(), TransportError> {
        let remote = IpEndpoint::new(self.address_of(host)?, port);
        let mut cx = Context::from_waker(Waker::noop());
        match self.socket.poll_send_to(payload, remote, &mut cx) {
            Poll::Ready(Ok(())) => Ok(()),
            Poll::Ready(Err(e)) => {
                warn!("UDP send failed: {:?}", Debug2Format(&e));
                Err(TransportError::SendFailed)
            }
            // Transmit buffer full
            Poll::Pending => Err(TransportError::SendFailed),
        }
    }

    fn poll_datagram(&mut self) -> Result<Option<usize>, TransportError> {
        if let Some(len) = self.staged_len {
            return Ok(Some(len));
        }

        let mut cx = Context::from_waker(Waker::noop());
        match self.socket.poll_recv_from(&mut self.staged, &mut cx) {
            Poll::Ready(Ok((len, _meta))) => {
                self.staged_len = Some(len);
                Ok(Some(len))
            }
            // Only truncation is reported; the datagram is dropped
            Poll::Ready(Err(_)) => Err(TransportError::BufferTooSmall),
            Poll::Pending => Ok(None),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let Some(len) = self.staged_len.take() else {
            return Ok(0);
        };
        let copied = len.min(buf.len());
        buf[..copied].copy_from_slice(&self.staged[..copied]);
        Ok(copied)
    }
}
