//! HD44780 character LCD over a PCF8574 I2C backpack
//!
//! The backpack wires the expander's eight outputs to the controller:
//!
//! | Bit | Signal |
//! |-----|--------|
//! | 0   | RS (0 = instruction, 1 = data) |
//! | 1   | RW (tied low, write only) |
//! | 2   | EN |
//! | 3   | Backlight |
//! | 4-7 | D4-D7 |
//!
//! With only four data lines the controller runs in 4-bit mode: every byte
//! goes over as two nibbles, high first. A nibble takes three expander
//! writes: present the data, raise EN, drop EN. The controller latches on
//! the falling edge.
//!
//! Nothing here retries. A failed write is reported as-is and the caller
//! decides what to do with it.

use embedded_hal_async::delay::DelayNs;
use raide_core::traits::cmd;
use raide_core::{CharacterLcd, DisplayConfig};
use raide_hal::{BusError, ExpanderBus};

/// Expander pin masks
pub mod pin {
    /// Register select: data when set
    pub const RS: u8 = 0x01;
    /// Enable strobe
    pub const EN: u8 = 0x04;
    /// Backlight transistor
    pub const BL: u8 = 0x08;
}

/// Wait after the first two 8-bit wake-up nibbles (ms)
const WAKE_DELAY_MS: u32 = 5;

/// Wait after the last wake-up nibble (µs)
const WAKE_FINAL_DELAY_US: u32 = 150;

/// Timing and backlight settings for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hd44780Timing {
    /// Wait before the first write after power-on (ms)
    pub power_on_delay_ms: u32,
    /// EN hold time, high and low (µs)
    pub enable_pulse_us: u32,
    /// Wait after clear/home and after init (ms)
    pub settle_ms: u32,
    /// Keep the backlight on
    pub backlight: bool,
}

impl Default for Hd44780Timing {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for Hd44780Timing {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            power_on_delay_ms: config.power_on_delay_ms,
            enable_pulse_us: config.enable_pulse_us(),
            settle_ms: config.settle_ms,
            backlight: config.backlight,
        }
    }
}

/// HD44780 driver in 4-bit mode
pub struct Hd44780<B, D> {
    bus: B,
    delay: D,
    timing: Hd44780Timing,
}

impl<B: ExpanderBus, D: DelayNs> Hd44780<B, D> {
    /// Create a driver; the controller is untouched until [`initialize`]
    ///
    /// [`initialize`]: CharacterLcd::initialize
    pub fn new(bus: B, delay: D, config: &DisplayConfig) -> Self {
        Self::with_timing(bus, delay, Hd44780Timing::from(config))
    }

    /// Create a driver with explicit timing
    pub fn with_timing(bus: B, delay: D, timing: Hd44780Timing) -> Self {
        Self { bus, delay, timing }
    }

    /// Timing in use
    pub fn timing(&self) -> &Hd44780Timing {
        &self.timing
    }

    /// Give the bus and delay back
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn backlight_bit(&self) -> u8 {
        if self.timing.backlight {
            pin::BL
        } else {
            0
        }
    }

    /// Put one byte on the expander pins
    pub async fn write_expander_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.bus.write_byte(byte).await
    }

    /// Strobe EN around `data`
    pub async fn pulse_enable(&mut self, data: u8) -> Result<(), BusError> {
        self.write_expander_byte(data | pin::EN).await?;
        self.delay.delay_us(self.timing.enable_pulse_us).await;
        self.write_expander_byte(data & !pin::EN).await?;
        self.delay.delay_us(self.timing.enable_pulse_us).await;
        Ok(())
    }

    /// Send the high four bits of `nibble` with register select `mode`
    pub async fn send_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), BusError> {
        let data = (nibble & 0xF0) | self.backlight_bit() | mode;
        self.write_expander_byte(data).await?;
        self.pulse_enable(data).await
    }

    /// Send a full byte as two nibbles, high first
    pub async fn send_byte(&mut self, value: u8, mode: u8) -> Result<(), BusError> {
        self.send_nibble(value & 0xF0, mode).await?;
        self.send_nibble(value << 4, mode).await
    }

    /// Send an instruction, waiting out clear and home
    pub async fn send_command(&mut self, command: u8) -> Result<(), BusError> {
        self.send_byte(command, 0).await?;
        if cmd::is_slow(command) {
            self.delay.delay_ms(self.timing.settle_ms).await;
        }
        Ok(())
    }

    /// Send a character code or CGRAM row
    pub async fn send_data(&mut self, byte: u8) -> Result<(), BusError> {
        self.send_byte(byte, pin::RS).await
    }

    /// Cold-start handshake into 4-bit, 2-line mode
    ///
    /// The controller may power up in 8-bit mode or halfway through a 4-bit
    /// transfer. Three 8-bit function-set nibbles put it into a known state
    /// before switching to 4-bit.
    pub async fn init_sequence(&mut self) -> Result<(), BusError> {
        self.delay.delay_ms(self.timing.power_on_delay_ms).await;

        for i in 0..3 {
            self.send_nibble(0x30, 0).await?;
            if i != 2 {
                self.delay.delay_ms(WAKE_DELAY_MS).await;
            }
        }
        self.delay.delay_us(WAKE_FINAL_DELAY_US).await;

        self.send_nibble(0x20, 0).await?;

        self.send_command(cmd::FUNCTION_SET_4BIT_2LINE).await?;
        self.send_command(cmd::DISPLAY_ON).await?;
        self.send_command(cmd::ENTRY_MODE_INCREMENT).await?;
        self.send_command(cmd::CLEAR_DISPLAY).await?;

        self.delay.delay_ms(self.timing.settle_ms).await;
        Ok(())
    }
}

impl<B: ExpanderBus, D: DelayNs> CharacterLcd for Hd44780<B, D> {
    async fn initialize(&mut self) -> Result<(), BusError> {
        self.init_sequence().await
    }

    async fn command(&mut self, command: u8) -> Result<(), BusError> {
        self.send_command(command).await
    }

    async fn write_data(&mut self, byte: u8) -> Result<(), BusError> {
        self.send_data(byte).await
    }
}
