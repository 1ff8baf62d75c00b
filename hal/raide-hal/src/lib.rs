//! Raide Hardware Abstraction Layer
//!
//! The LCD sits behind an I/O expander that only understands single-byte
//! writes. This crate defines that one primitive so the protocol driver can
//! be written once and run against real I2C, a test fake, or anything else
//! that can push a byte at the expander.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  raide-drivers (HD44780 4-bit protocol) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  raide-hal (this crate - ExpanderBus)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal-async I2C (embassy-rp...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::ExpanderBus`] - single-byte writes to the expander

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export key types at crate root for convenience
pub use i2c::{BusError, ExpanderBus, ExpanderConfig, I2cExpander};
