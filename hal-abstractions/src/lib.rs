//! Hardware abstraction traits for network time sync
//!
//! This crate defines the capabilities the time sync state machine needs
//! from the board: a datagram socket and a millisecond clock. BSPs implement
//! these traits; hosted builds get ready-made implementations behind the
//! `std` feature.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod host_cache;
pub mod network;
#[cfg(feature = "std")]
pub mod std_impl;

pub use clock::MonotonicClock;
pub use host_cache::{HostCache, MAX_HOST_NAME_LEN};
pub use network::{DatagramTransport, TransportError};
#[cfg(feature = "std")]
pub use std_impl::{StdClock, StdUdpTransport};
