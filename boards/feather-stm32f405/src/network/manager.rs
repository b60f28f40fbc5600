#![deny(unsafe_code)]
#![deny(warnings)]
//! Network bring-up and the wall clock loop
//!
//! Waits for DHCP, resolves the NTP server, then polls the SNTP session at a
//! fixed period for the life of the firmware. A server that keeps timing out
//! is looked up again, since pool addresses rotate.

use defmt::{info, warn, Display2Format};
use embassy_net::Stack;
use embassy_stm32::gpio::Output;
use ntptime_core::{SntpSession, SyncConfig, SyncStatus, TimeoutStreak};
use rtic_monotonics::fugit::ExtU64;
use rtic_monotonics::Monotonic;

use super::config::ClockConfig;
use super::transport::{EthernetUdpTransport, UdpBuffers};
use crate::time::EmbassyClock;
use crate::Mono;

/// Wait for network configuration (DHCP) and log IP address
pub async fn wait_for_config(stack: &Stack<'_>) {
    info!("Waiting for DHCP...");
    stack.wait_config_up().await;
    info!("Network is UP!");

    if let Some(config) = stack.config_v4() {
        let ip = config.address.address();
        let octets = ip.octets();
        info!(
            "IP: {}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        );

        if let Some(gateway) = config.gateway {
            let gw_octets = gateway.octets();
            info!(
                "Gateway: {}.{}.{}.{}",
                gw_octets[0], gw_octets[1], gw_octets[2], gw_octets[3]
            );
        }
    }
}

fn session_config(clock: &ClockConfig) -> SyncConfig {
    let mut config = SyncConfig::default();
    if let Err(e) = config.set_server(clock.server) {
        warn!("{}; using {}", Display2Format(&e), config.server.as_str());
    }
    if let Err(e) = config.set_send_interval(clock.send_interval_secs) {
        warn!("{}", Display2Format(&e));
    }
    if let Err(e) = config.set_receive_timeout(clock.receive_timeout_secs) {
        warn!("{}", Display2Format(&e));
    }
    config
}

/// Keep local time in sync; `led` is lit while the last result was valid
pub async fn run_clock(stack: Stack<'static>, clock: ClockConfig, mut led: Output<'static>) -> ! {
    let config = session_config(&clock);

    let mut buffers = UdpBuffers::new();
    let mut transport = EthernetUdpTransport::new(stack, &mut buffers);
    while let Err(e) = transport.resolve(config.server.as_str()).await {
        warn!(
            "Could not resolve {}: {}, retrying",
            config.server.as_str(),
            e
        );
        Mono::delay(clock.dns_retry_ms.millis()).await;
    }

    let mut session = SntpSession::with_config(config, transport, EmbassyClock);
    info!(
        "SNTP session ready: every {} ms, timeout {} ms",
        session.send_interval_ms(),
        session.receive_timeout_ms()
    );

    let mut streak = TimeoutStreak::new(clock.timeouts_before_resolve);
    loop {
        let now = session.poll(&clock.zone, None);
        match now.status {
            SyncStatus::Valid => {
                led.set_high();
                info!("Local time: {}", Display2Format(&now));
            }
            SyncStatus::HostTimeout => {
                led.set_low();
                warn!("NTP server did not answer");
            }
            SyncStatus::NoData => {}
        }

        if streak.record(now.status) {
            let server = session.config().server.clone();
            session.transport_mut().forget();
            match session.transport_mut().resolve(server.as_str()).await {
                Ok(_) => info!("Re-resolved {}", server.as_str()),
                // Sends report Unresolved until a later streak retries
                Err(e) => warn!("Could not re-resolve {}: {}", server.as_str(), e),
            }
        }
        Mono::delay(clock.poll_period_ms.millis()).await;
    }
}
