//! Shared state between Embassy tasks

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use portable_atomic::AtomicBool;

use raide_core::DisplayService;

/// Text submissions and the render worker's hand-off slot
pub static DISPLAY: DisplayService<CriticalSectionRawMutex> = DisplayService::new();

/// Set once the controller answered its initialization handshake
///
/// Stays false when every attempt failed; submissions are then refused
/// instead of piling up behind a worker that will never run.
pub static DISPLAY_ONLINE: AtomicBool = AtomicBool::new(false);
