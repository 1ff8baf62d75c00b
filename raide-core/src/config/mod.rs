//! Display configuration
//!
//! Timing and policy knobs for the driver, renderer and attach sequence.
//! Defaults match a stock 16x2 HD44780 module on a PCF8574 backpack; the
//! firmware overrides them from `display.toml`.

pub mod toml;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::toml::{parse_config, ParseError};

use raide_hal::ExpanderConfig;

/// What to print for a multi-byte character with no loaded glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnmappedGlyph {
    /// Send the sequence's first byte to the ROM unchanged
    #[default]
    LeadingByte,
    /// Send this character code instead
    ///
    /// Codes 0-7 print CGRAM slots and are never used; the leading byte
    /// goes out in their place.
    Placeholder(u8),
}

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit I2C address of the expander
    pub i2c_address: u8,
    /// I2C clock in Hz
    pub i2c_frequency: u32,
    /// Backlight bit on every expander write
    pub backlight: bool,
    /// Wait after power-on before the first init write (ms)
    pub power_on_delay_ms: u32,
    /// Initialization attempts before giving up
    pub init_attempts: u8,
    /// Pause between failed initialization attempts (ms)
    pub init_cooldown_ms: u32,
    /// Enable pulse hold time (µs), 450-1000
    pub enable_pulse_us: u32,
    /// Wait after clear/home (ms)
    pub settle_ms: u32,
    /// Extra attempts per character before a print fails
    pub print_retries: u8,
    /// Time each scroll frame stays on screen (ms)
    pub frame_dwell_ms: u32,
    /// Policy for characters without a glyph
    pub unmapped: UnmappedGlyph,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayConfig {
    /// Shortest enable pulse the controller latches reliably
    pub const MIN_ENABLE_PULSE_US: u32 = 450;
    /// Longest enable pulse worth waiting for
    pub const MAX_ENABLE_PULSE_US: u32 = 1000;

    /// Defaults for a stock module
    pub const fn new() -> Self {
        Self {
            i2c_address: 0x27,
            i2c_frequency: 100_000,
            backlight: true,
            power_on_delay_ms: 50,
            init_attempts: 15,
            init_cooldown_ms: 200,
            enable_pulse_us: 450,
            settle_ms: 2,
            print_retries: 5,
            frame_dwell_ms: 300,
            unmapped: UnmappedGlyph::LeadingByte,
        }
    }

    /// Enable pulse clamped to the range the controller tolerates
    pub fn enable_pulse_us(&self) -> u32 {
        self.enable_pulse_us
            .clamp(Self::MIN_ENABLE_PULSE_US, Self::MAX_ENABLE_PULSE_US)
    }

    /// Expander bus settings
    pub const fn bus(&self) -> ExpanderConfig {
        ExpanderConfig {
            address: self.i2c_address,
            frequency: self.i2c_frequency,
        }
    }
}
