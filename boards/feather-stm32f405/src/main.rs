#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod eth;
mod network;
mod time;

stm32_tim2_monotonic!(Mono, 1_000_000);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1, USART2])]
mod app {
    use super::*;
    use defmt::info;
    use embassy_futures::join::join3;
    use embassy_stm32::exti::ExtiInput;
    use embassy_stm32::gpio::{Level, Output, Pull, Speed};
    use embassy_stm32::peripherals;
    use embassy_stm32::rcc::{Hse, HseMode};
    use embassy_stm32::spi::{self, Spi};
    use embassy_stm32::time::Hertz;

    use network::{manager, ClockConfig, NetworkConfig};

    type Periph<P> = embassy_stm32::Peri<'static, P>;

    struct NetworkPeripherals {
        spi: Periph<peripherals::SPI2>,
        sck: Periph<peripherals::PB13>,
        mosi: Periph<peripherals::PB15>,
        miso: Periph<peripherals::PB14>,
        cs: Periph<peripherals::PC6>,
        reset: Periph<peripherals::PC3>,
        int: Periph<peripherals::PC2>,
        exti: Periph<peripherals::EXTI2>,
        dma_tx: Periph<peripherals::DMA1_CH4>,
        dma_rx: Periph<peripherals::DMA1_CH3>,
    }

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("NTP clock starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE
        // HSE / 6 = 2 MHz, * 168 = 336 MHz VCO, / 4 = 84 MHz SYSCLK
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: None,
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        let p = embassy_stm32::init(config);
        info!("System clock: 84 MHz from 12 MHz HSE");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        Mono::start(84_000_000);

        // Red LED next to the USB connector
        let led = Output::new(p.PC1, Level::Low, Speed::Low);

        let net_periph = NetworkPeripherals {
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            cs: p.PC6,
            reset: p.PC3,
            int: p.PC2,
            exti: p.EXTI2,
            dma_tx: p.DMA1_CH4,
            dma_rx: p.DMA1_CH3,
        };

        clock_task::spawn(net_periph, led).ok();

        (Shared {}, Local {})
    }

    /// Owns the network stack and the SNTP session
    ///
    /// Stack is !Send and must remain within this task.
    #[task(priority = 1)]
    async fn clock_task(
        _cx: clock_task::Context,
        periph: NetworkPeripherals,
        led: Output<'static>,
    ) -> ! {
        info!("Clock task started");

        let mut spi_config = spi::Config::default();
        spi_config.frequency = Hertz(10_000_000); // 10 MHz for W5500

        let spi = Spi::new(
            periph.spi,
            periph.sck,
            periph.mosi,
            periph.miso,
            periph.dma_tx,
            periph.dma_rx,
            spi_config,
        );

        let eth_periph = eth::EthPeripherals {
            spi,
            cs: Output::new(periph.cs, Level::High, Speed::VeryHigh),
            reset: Output::new(periph.reset, Level::High, Speed::Low),
            int: ExtiInput::new(periph.int, periph.exti, Pull::Up),
        };

        let (stack, w5500_runner, mut net_runner) =
            eth::init_stack(eth_periph, &NetworkConfig::default()).await;

        let app_logic = async {
            manager::wait_for_config(&stack).await;
            manager::run_clock(stack, ClockConfig::default(), led).await;
        };

        join3(w5500_runner.run(), net_runner.run(), app_logic).await;
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started - entering WFI loop");
        loop {
            cortex_m::asm::wfi();
        }
    }
}
