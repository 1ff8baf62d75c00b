//! Error types
//!
//! A failed expander write surfaces as [`BusError`]. Operations built from
//! several writes wrap it in a [`ProtocolError`] naming what was in progress,
//! and the render cycle reports either of those or a working-buffer failure.

use raide_hal::BusError;

/// Composed controller operation that was in progress when a write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Cold-start handshake (all retry attempts exhausted)
    Initialize,
    /// Clear display
    Clear,
    /// Set DDRAM address
    SetCursor,
    /// Programming a CGRAM slot
    DefineGlyph(u8),
    /// Printing a display row
    PrintLine(u8),
}

/// A multi-write operation partially failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolError {
    /// What was being done
    pub op: Operation,
    /// The write failure that stopped it
    pub source: BusError,
}

impl ProtocolError {
    /// Build an error for `op` caused by `source`
    pub const fn new(op: Operation, source: BusError) -> Self {
        Self { op, source }
    }
}

/// Why a render cycle stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Controller communication failed
    Protocol(ProtocolError),
    /// A working buffer could not hold the frame
    Allocation,
}

impl From<ProtocolError> for RenderError {
    fn from(e: ProtocolError) -> Self {
        RenderError::Protocol(e)
    }
}

/// Submission rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubmitError {
    /// A render cycle is already in progress
    Busy,
}

/// Extension for tagging a bus result with the operation it belongs to
pub(crate) trait ResultExt<T> {
    fn during(self, op: Operation) -> Result<T, ProtocolError>;
}

impl<T> ResultExt<T> for Result<T, BusError> {
    fn during(self, op: Operation) -> Result<T, ProtocolError> {
        self.map_err(|source| ProtocolError::new(op, source))
    }
}
