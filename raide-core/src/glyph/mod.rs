//! Custom glyphs
//!
//! Fixed bitmaps for the Lithuanian letters plus the per-frame pool that
//! maps letters found in the text onto the controller's 8 CGRAM slots.

pub mod pool;
pub mod table;

pub use pool::{CustomGlyphSlot, GlyphPool, LoadReport, MAX_CUSTOM_GLYPHS};
pub use table::{find_known_letter, glyph, GlyphDefinition, GLYPHS, GLYPH_COUNT};
