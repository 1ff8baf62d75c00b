//! Board-agnostic core logic for the Raide LCD firmware
//!
//! This crate contains everything between "a caller hands us some UTF-8"
//! and "the controller receives commands", without depending on a specific
//! bus or timer:
//!
//! - The [`CharacterLcd`] trait the HD44780 driver implements
//! - The Lithuanian glyph table and the 8-slot CGRAM pool
//! - Message windowing and the timed scroll renderer
//! - The display service (busy flag + single-slot hand-off to one worker)
//! - Configuration types and a small TOML subset parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

#[cfg(test)]
mod testing;

pub mod config;
pub mod error;
pub mod glyph;
pub mod message;
pub mod scroll;
pub mod service;
pub mod traits;

pub use config::{DisplayConfig, UnmappedGlyph};
pub use error::{Operation, ProtocolError, RenderError, SubmitError};
pub use message::{Line, Message, MAX_MESSAGE_LEN};
pub use scroll::{Frame, RenderSummary, ScrollRenderer};
pub use service::DisplayService;
pub use traits::{initialize_with_retry, CharacterLcd};

pub use raide_hal::BusError;

/// Visible columns per display row
pub const LCD_COLS: usize = 16;

/// Display rows
pub const LCD_ROWS: usize = 2;
