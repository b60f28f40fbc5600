#![deny(unsafe_code)]
#![deny(warnings)]
//! W5500 Ethernet FeatherWing bring-up

use defmt::info;
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice as SpiDeviceBus;
use embassy_net::{Config, Stack, StackResources};
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Async;
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;

use crate::network::NetworkConfig;

type SpiBus = Mutex<CriticalSectionRawMutex, Spi<'static, Async>>;
type W5500Spi = SpiDeviceBus<'static, CriticalSectionRawMutex, Spi<'static, Async>, Output<'static>>;

/// Driver runner; must be polled continuously alongside the stack runner
pub type W5500Runner = Runner<'static, W5500, W5500Spi, ExtiInput<'static>, Output<'static>>;

/// embassy-net runner for the W5500 device
pub type NetRunner = embassy_net::Runner<'static, Device<'static>>;

/// Sockets: one UDP for NTP, one for DHCP, one for DNS
const SOCKET_COUNT: usize = 3;

/// Ethernet peripherals bundle
pub struct EthPeripherals {
    pub spi: Spi<'static, Async>,
    pub cs: Output<'static>,
    pub reset: Output<'static>,
    pub int: ExtiInput<'static>,
}

/// Reset the W5500 and start a DHCP-configured embassy-net stack on it
///
/// Returns the stack plus both runners; nothing moves on the wire until the
/// runners are polled.
pub async fn init_stack(
    periph: EthPeripherals,
    config: &NetworkConfig,
) -> (Stack<'static>, W5500Runner, NetRunner) {
    let EthPeripherals {
        spi,
        cs,
        mut reset,
        int,
    } = periph;

    info!("Performing W5500 hardware reset...");
    reset.set_low();
    embassy_time::Timer::after_millis(1).await;
    reset.set_high();
    embassy_time::Timer::after_millis(2).await;

    static SPI_BUS: StaticCell<SpiBus> = StaticCell::new();
    let spi_bus = SPI_BUS.init(Mutex::new(spi));
    let spi_device = SpiDeviceBus::new(spi_bus, cs);

    let mac = config.mac_addr;
    info!(
        "MAC address: {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );

    static STATE: StaticCell<embassy_net_wiznet::State<8, 8>> = StaticCell::new();
    let state = STATE.init(embassy_net_wiznet::State::<8, 8>::new());

    // No way to run without the NIC; fail loudly at boot
    let (device, w5500_runner) = embassy_net_wiznet::new(mac, state, spi_device, int, reset)
        .await
        .unwrap();
    info!("W5500 initialized");

    static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();
    let (stack, net_runner) = embassy_net::new(
        device,
        Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        config.seed,
    );
    info!("Network stack initialized with DHCP");

    (stack, w5500_runner, net_runner)
}
