//! Character LCD trait
//!
//! The renderer and glyph pool only ever need three primitives from the
//! controller: send a command, send a data byte, and run the cold-start
//! handshake. Everything else (clear, cursor placement, CGRAM programming)
//! is expressed on top of those here, so the HD44780 driver and the test
//! fakes share one definition of what those commands look like.

use embedded_hal_async::delay::DelayNs;
use raide_hal::BusError;

use crate::error::{Operation, ProtocolError};

/// HD44780 instruction set (the subset this firmware uses)
pub mod cmd {
    /// Clear display, cursor home. Slow (~1.5ms inside the controller)
    pub const CLEAR_DISPLAY: u8 = 0x01;
    /// Cursor home without clearing. Also slow
    pub const RETURN_HOME: u8 = 0x02;
    /// Entry mode: increment address, no display shift
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// Function set: 4-bit bus, 2 lines, 5x8 font
    pub const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
    /// Set CGRAM address (OR with slot << 3)
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    /// Set DDRAM address (OR with row offset + column)
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    /// DDRAM base address of each row
    pub const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

    /// Commands that need a settle delay after being sent
    pub const fn is_slow(cmd: u8) -> bool {
        cmd == CLEAR_DISPLAY || cmd == RETURN_HOME
    }

    /// Set-DDRAM-address command for a cursor position
    ///
    /// Rows past the second and columns past the last are clamped.
    pub const fn cursor_address(row: u8, col: u8) -> u8 {
        let row = if row > 1 { 1 } else { row };
        let col = if col as usize >= crate::LCD_COLS {
            (crate::LCD_COLS - 1) as u8
        } else {
            col
        };
        SET_DDRAM_ADDR | (col + ROW_OFFSETS[row as usize])
    }

    /// Set-CGRAM-address command for the first row of a glyph slot
    pub const fn glyph_address(slot: u8) -> u8 {
        SET_CGRAM_ADDR | ((slot & 0x07) << 3)
    }
}

/// A write-only HD44780-style character display
///
/// Implementations send exactly what they are asked to; retry policy lives
/// with the callers.
#[allow(async_fn_in_trait)]
pub trait CharacterLcd {
    /// Run the controller's cold-start handshake
    async fn initialize(&mut self) -> Result<(), BusError>;

    /// Send an instruction byte (waits out slow instructions)
    async fn command(&mut self, cmd: u8) -> Result<(), BusError>;

    /// Send a data byte to the current DDRAM/CGRAM address
    async fn write_data(&mut self, byte: u8) -> Result<(), BusError>;

    /// Clear the display and return the cursor home
    async fn clear(&mut self) -> Result<(), BusError> {
        self.command(cmd::CLEAR_DISPLAY).await
    }

    /// Move the cursor to `row` (0-1), `col` (0-15)
    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), BusError> {
        self.command(cmd::cursor_address(row, col)).await
    }

    /// Program a 5x8 bitmap into CGRAM slot `slot` (0-7)
    ///
    /// Leaves the address counter in CGRAM; set the cursor before printing.
    async fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), BusError> {
        self.command(cmd::glyph_address(slot)).await?;
        for &row in bitmap {
            self.write_data(row).await?;
        }
        Ok(())
    }
}

impl<T: CharacterLcd> CharacterLcd for &mut T {
    async fn initialize(&mut self) -> Result<(), BusError> {
        T::initialize(self).await
    }

    async fn command(&mut self, cmd: u8) -> Result<(), BusError> {
        T::command(self, cmd).await
    }

    async fn write_data(&mut self, byte: u8) -> Result<(), BusError> {
        T::write_data(self, byte).await
    }

    async fn clear(&mut self) -> Result<(), BusError> {
        T::clear(self).await
    }

    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), BusError> {
        T::set_cursor(self, row, col).await
    }

    async fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), BusError> {
        T::define_glyph(self, slot, bitmap).await
    }
}

/// Bring the controller up, retrying while the bus settles after power-on
///
/// Early writes after power-on commonly fail. Each failed attempt is
/// followed by `cooldown_ms` before the next one. Returns the 1-based
/// attempt that succeeded.
pub async fn initialize_with_retry<L, D>(
    lcd: &mut L,
    delay: &mut D,
    attempts: u8,
    cooldown_ms: u32,
) -> Result<u8, ProtocolError>
where
    L: CharacterLcd,
    D: DelayNs,
{
    let attempts = attempts.max(1);
    let mut last = BusError::Other;

    for attempt in 1..=attempts {
        match lcd.initialize().await {
            Ok(()) => {
                if attempt > 1 {
                    info!("LCD initialized on attempt {}/{}", attempt, attempts);
                }
                return Ok(attempt);
            }
            Err(e) => {
                debug!("LCD init attempt {} failed: {:?}", attempt, e);
                last = e;
                if attempt < attempts {
                    delay.delay_ms(cooldown_ms).await;
                }
            }
        }
    }

    error!("LCD init failed after {} attempts", attempts);
    Err(ProtocolError::new(Operation::Initialize, last))
}
