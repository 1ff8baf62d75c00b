//! Marquee scrolling
//!
//! A message is shown through a two-row window, 16 cells per row. Messages
//! of up to 32 cells fit in a single frame; longer ones slide the window one
//! cell at a time until the last cell sits at the bottom-right corner.

pub mod frame;
pub mod renderer;

pub use frame::Frame;
pub use renderer::{RenderSummary, ScrollRenderer};

use crate::{LCD_COLS, LCD_ROWS};

/// Cells visible at once across both rows
pub const WINDOW_CELLS: usize = LCD_COLS * LCD_ROWS;

/// Number of frames needed to show `cell_count` cells
///
/// Always at least one, so an empty or short message still draws.
pub const fn scroll_steps(cell_count: usize) -> usize {
    if cell_count <= WINDOW_CELLS {
        1
    } else {
        cell_count - WINDOW_CELLS + 1
    }
}
