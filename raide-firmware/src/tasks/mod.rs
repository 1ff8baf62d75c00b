//! Embassy async tasks
//!
//! Each task runs independently and communicates through the shared
//! display service in [`crate::channels`].

pub mod console;
pub mod render;

pub use console::console_task;
pub use render::render_task;
