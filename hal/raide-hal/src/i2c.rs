//! I2C expander bus
//!
//! A PCF8574-style expander latches whatever byte it last received onto its
//! eight output pins. Every higher-level LCD operation is built from that
//! single write, so it is the only place a hardware failure can originate.

use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::i2c::I2c;

/// Error from a single expander write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received (address or data)
    Nack,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => BusError::Bus,
            ErrorKind::ArbitrationLoss => BusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => BusError::Nack,
            ErrorKind::Overrun => BusError::Overrun,
            _ => BusError::Other,
        }
    }
}

/// Byte-oriented write access to the I/O expander
///
/// Implementations must perform exactly one bus transaction per call and
/// report its failure; callers decide whether to retry.
#[allow(async_fn_in_trait)]
pub trait ExpanderBus {
    /// Write one byte to the expander's output latch
    async fn write_byte(&mut self, byte: u8) -> Result<(), BusError>;
}

impl<T: ExpanderBus> ExpanderBus for &mut T {
    async fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        T::write_byte(self, byte).await
    }
}

/// Expander bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpanderConfig {
    /// 7-bit I2C address (0x27 for most PCF8574 backpacks, 0x3F for PCF8574A)
    pub address: u8,
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl ExpanderConfig {
    /// Standard mode (100 kHz) at the common backpack address
    pub const STANDARD: Self = Self {
        address: 0x27,
        frequency: 100_000,
    };

    /// Fast mode (400 kHz) at the common backpack address
    pub const FAST: Self = Self {
        address: 0x27,
        frequency: 400_000,
    };

    /// Same timing, different device address
    pub const fn with_address(self, address: u8) -> Self {
        Self { address, ..self }
    }
}

/// [`ExpanderBus`] over any async I2C master
pub struct I2cExpander<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cExpander<I2C> {
    /// Wrap an I2C master talking to the expander at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the I2C master back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ExpanderBus for I2cExpander<I2C> {
    async fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[byte])
            .await
            .map_err(|e| BusError::from(e.kind()))
    }
}
