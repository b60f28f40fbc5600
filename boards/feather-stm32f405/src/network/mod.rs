#![deny(warnings)]
//! Network module
//!
//! - **`config`**: Configuration structs with `Default` implementations
//! - **`manager`**: DHCP bring-up and the NTP polling loop
//! - **`transport`**: Non-blocking UDP transport for the NTP session

pub mod config;
pub mod manager;
pub mod transport;

pub use config::{ClockConfig, NetworkConfig};
