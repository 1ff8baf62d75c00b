//! Raide - HD44780 marquee display firmware
//!
//! Main firmware binary for RP2040 boards driving a 16x2 character LCD
//! through a PCF8574 I2C backpack. Text arrives line by line on UART0 and
//! scrolls across the display, Lithuanian letters included.
//!
//! Wiring (Raspberry Pi Pico):
//! - I2C0: SDA = GPIO4, SCL = GPIO5
//! - UART0: TX = GPIO0, RX = GPIO1, 115200 8N1

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use raide_core::config::parse_config;
use raide_core::{DisplayConfig, ScrollRenderer};
use raide_drivers::Hd44780;
use raide_hal::I2cExpander;

mod channels;
mod tasks;

/// Embedded display configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Raide firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Display config: addr={=u8:#x}, {} Hz, {} init attempts",
        config.i2c_address, config.i2c_frequency, config.init_attempts
    );

    // I2C0 to the LCD backpack
    let bus = config.bus();
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = bus.frequency;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let expander = I2cExpander::new(i2c, bus.address);
    let lcd = Hd44780::new(expander, Delay, &config);
    let renderer = ScrollRenderer::new(lcd, Delay, config);

    info!("LCD bus initialized");

    // UART0 for text submissions
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);

    info!("UART initialized for text submissions");

    spawner.spawn(tasks::render_task(renderer)).unwrap();
    spawner.spawn(tasks::console_task(uart)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration, falling back to defaults
///
/// build.rs already rejected a broken display.toml, so the fallback only
/// matters when the two parsers disagree.
fn load_config() -> DisplayConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default display configuration");
            DisplayConfig::default()
        }
    }
}
