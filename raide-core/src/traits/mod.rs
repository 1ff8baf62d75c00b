//! Hardware abstraction traits
//!
//! These traits define the interface between the glyph/scroll logic and the
//! concrete controller driver.

pub mod lcd;

pub use lcd::{cmd, initialize_with_retry, CharacterLcd};
