//! CGRAM slot pool
//!
//! The controller has 8 programmable character slots. Slot `n` lives at
//! CGRAM address `n << 3` and is printed by sending character code `n`, so
//! the pool index, the CGRAM slot and the substitute code are one number.
//!
//! The pool is only valid for the frame being drawn: the renderer resets it
//! before each scroll step and reloads whatever letters the new window
//! contains.

use heapless::Vec;

use crate::config::UnmappedGlyph;
use crate::error::{Operation, ProtocolError, ResultExt};
use crate::glyph::table::{find_known_letter, GLYPHS};
use crate::message::MAX_CELL_LEN;
use crate::traits::CharacterLcd;

/// Programmable character slots on the controller
pub const MAX_CUSTOM_GLYPHS: usize = 8;

/// A letter currently programmed into CGRAM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomGlyphSlot {
    /// CGRAM slot, also the character code that prints it
    pub slot: u8,
    /// UTF-8 encoding of the letter
    pub letter: Vec<u8, MAX_CELL_LEN>,
    /// Bitmap written to the slot
    pub bitmap: [u8; 8],
}

/// Outcome of loading one line's letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Slots programmed by this call
    pub loaded: u8,
    /// Letter occurrences that found the pool full
    pub overflowed: u8,
}

/// Live CGRAM slots for the current frame
#[derive(Debug, Default)]
pub struct GlyphPool {
    slots: Vec<CustomGlyphSlot, MAX_CUSTOM_GLYPHS>,
}

impl GlyphPool {
    /// Empty pool
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Forget all slots
    ///
    /// The controller's CGRAM keeps its old contents; they are simply no
    /// longer referenced and get overwritten as new letters load.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Slots in allocation order
    pub fn slots(&self) -> &[CustomGlyphSlot] {
        &self.slots
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is in use
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether every slot is in use
    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// Slot holding exactly this cell's letter
    pub fn find_slot(&self, cell: &[u8]) -> Option<u8> {
        self.slots
            .iter()
            .find(|s| s.letter.as_slice() == cell)
            .map(|s| s.slot)
    }

    /// Program CGRAM for every known letter in `cells` not already loaded
    ///
    /// Letters are allocated in first-seen order. When the pool is full a
    /// new letter is skipped and scanning continues; the skipped letter
    /// later prints per the unmapped policy.
    pub async fn load_for_line<'c, L, I>(
        &mut self,
        lcd: &mut L,
        cells: I,
    ) -> Result<LoadReport, ProtocolError>
    where
        L: CharacterLcd,
        I: IntoIterator<Item = &'c [u8]>,
    {
        let mut report = LoadReport::default();

        for cell in cells {
            let Some(index) = find_known_letter(cell) else {
                continue;
            };
            if self.find_slot(cell).is_some() {
                continue;
            }
            if self.is_full() {
                warn!("Glyph pool full, skipping letter {}", index);
                report.overflowed = report.overflowed.saturating_add(1);
                continue;
            }

            let Ok(letter) = Vec::from_slice(cell) else {
                continue;
            };
            let slot = self.slots.len() as u8;
            let bitmap = GLYPHS[index].bitmap;

            lcd.define_glyph(slot, &bitmap)
                .await
                .during(Operation::DefineGlyph(slot))?;
            trace!("Glyph {} loaded into slot {}", index, slot);

            // Cannot fail: checked `is_full` above
            let _ = self.slots.push(CustomGlyphSlot {
                slot,
                letter,
                bitmap,
            });
            report.loaded += 1;
        }

        Ok(report)
    }

    /// Character code to send for `cell`
    ///
    /// Loaded letters print from their slot. Single-byte cells go to the ROM
    /// as-is. Anything else is unmapped and follows `unmapped`.
    pub fn resolve_for_print(&self, cell: &[u8], unmapped: UnmappedGlyph) -> u8 {
        if let Some(slot) = self.find_slot(cell) {
            return slot;
        }
        match (cell, unmapped) {
            ([], _) => b' ',
            ([byte], _) => *byte,
            (_, UnmappedGlyph::Placeholder(code)) if usize::from(code) >= MAX_CUSTOM_GLYPHS => code,
            ([lead, ..], _) => *lead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Cells;
    use crate::testing::{FakeLcd, Op};
    use embassy_futures::block_on;

    fn load(pool: &mut GlyphPool, lcd: &mut FakeLcd, text: &str) -> LoadReport {
        block_on(pool.load_for_line(lcd, Cells::new(text.as_bytes()))).unwrap()
    }

    #[test]
    fn test_ascii_line_allocates_nothing() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        let report = load(&mut pool, &mut lcd, "labas           ");

        assert_eq!(report, LoadReport::default());
        assert!(pool.is_empty());
        assert!(lcd.ops.is_empty());
    }

    #[test]
    fn test_letters_allocated_in_first_seen_order() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        let report = load(&mut pool, &mut lcd, "ąĄ");

        assert_eq!(report.loaded, 2);
        assert_eq!(pool.find_slot("ą".as_bytes()), Some(0));
        assert_eq!(pool.find_slot("Ą".as_bytes()), Some(1));
        assert_eq!(lcd.ops[0], Op::Command(0x40));
        assert_eq!(lcd.ops[9], Op::Command(0x48));
        assert_eq!(lcd.data_after(0x40), GLYPHS[0].bitmap.to_vec());
        assert_eq!(lcd.data_after(0x48), GLYPHS[1].bitmap.to_vec());
    }

    #[test]
    fn test_repeated_letter_reuses_slot() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        let report = load(&mut pool, &mut lcd, "žąžąž");

        assert_eq!(report.loaded, 2);
        assert_eq!(pool.len(), 2);
        assert_eq!(lcd.glyph_definitions(), 2);
        assert_eq!(pool.slots()[0].letter.as_slice(), "ž".as_bytes());
    }

    #[test]
    fn test_second_line_keeps_first_line_slots() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        load(&mut pool, &mut lcd, "ąč");
        let report = load(&mut pool, &mut lcd, "čę");

        assert_eq!(report.loaded, 1);
        assert_eq!(pool.find_slot("ę".as_bytes()), Some(2));
        assert_eq!(lcd.glyph_definitions(), 3);
    }

    #[test]
    fn test_ninth_letter_is_skipped() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        // Nine distinct letters, then the first again
        let report = load(&mut pool, &mut lcd, "ąĄčČęĘėĖįą");

        assert_eq!(report.loaded, 8);
        assert_eq!(report.overflowed, 1);
        assert!(pool.is_full());
        assert_eq!(lcd.glyph_definitions(), 8);
        assert_eq!(pool.find_slot("į".as_bytes()), None);

        // Skipped letter never borrows another letter's slot
        let code = pool.resolve_for_print("į".as_bytes(), UnmappedGlyph::LeadingByte);
        assert_eq!(code, 0xC4);
        assert!(code as usize >= MAX_CUSTOM_GLYPHS);
    }

    #[test]
    fn test_scanning_continues_after_overflow() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();

        let report = load(&mut pool, &mut lcd, "ąĄčČęĘėĖįĮ");

        assert_eq!(report.overflowed, 2);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_reset_clears_pool() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();
        load(&mut pool, &mut lcd, "ą");

        pool.reset();

        assert!(pool.is_empty());
        let report = load(&mut pool, &mut lcd, "ž");
        assert_eq!(pool.find_slot("ž".as_bytes()), Some(0));
        assert_eq!(report.loaded, 1);
    }

    #[test]
    fn test_programming_failure_does_not_record_slot() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();
        lcd.fail_command = Some((0x40, 1));

        let result = block_on(pool.load_for_line(&mut lcd, Cells::new("ą".as_bytes())));

        assert_eq!(
            result,
            Err(ProtocolError::new(
                Operation::DefineGlyph(0),
                raide_hal::BusError::Nack
            ))
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn test_resolve_for_print() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();
        load(&mut pool, &mut lcd, "šū");

        let policy = UnmappedGlyph::LeadingByte;
        assert_eq!(pool.resolve_for_print("š".as_bytes(), policy), 0);
        assert_eq!(pool.resolve_for_print("ū".as_bytes(), policy), 1);
        assert_eq!(pool.resolve_for_print(b"a", policy), b'a');
        assert_eq!(pool.resolve_for_print("ö".as_bytes(), policy), 0xC3);
        assert_eq!(pool.resolve_for_print(b"", policy), b' ');

        let placeholder = UnmappedGlyph::Placeholder(b'?');
        assert_eq!(pool.resolve_for_print("ö".as_bytes(), placeholder), b'?');
        assert_eq!(pool.resolve_for_print(b"a", placeholder), b'a');
        assert_eq!(pool.resolve_for_print("š".as_bytes(), placeholder), 0);
    }

    #[test]
    fn test_slot_code_placeholder_ignored() {
        let mut pool = GlyphPool::new();
        let mut lcd = FakeLcd::new();
        load(&mut pool, &mut lcd, "ą");

        let slot_code = UnmappedGlyph::Placeholder(0);
        assert_eq!(pool.resolve_for_print("į".as_bytes(), slot_code), 0xC4);
        assert_eq!(pool.resolve_for_print("ą".as_bytes(), slot_code), 0);
    }
}
