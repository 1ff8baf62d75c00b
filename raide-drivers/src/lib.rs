//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in raide-core:
//!
//! - HD44780 character LCD behind a PCF8574 I2C backpack (4-bit mode)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod hd44780;

pub use hd44780::{Hd44780, Hd44780Timing};
