//! Lithuanian letter bitmaps
//!
//! The HD44780 character ROM has no Lithuanian diacritics. Each entry here
//! is the letter's UTF-8 encoding and a 5x8 bitmap, one byte per pixel row
//! (bits 4..0, top row first), ready for a CGRAM slot.

/// A letter the character ROM lacks, with the bitmap that replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphDefinition {
    /// UTF-8 encoding of the letter
    pub letter: &'static str,
    /// Pixel rows, 5 significant bits each
    pub bitmap: [u8; 8],
}

/// Number of letters with a bitmap
pub const GLYPH_COUNT: usize = 18;

/// Every letter with a bitmap, lower case before upper case
///
/// Č, Š, Ū and Ž share their lower-case shapes: a 5x8 cell has no room for
/// both the caron and a full-height capital.
#[rustfmt::skip]
pub static GLYPHS: [GlyphDefinition; GLYPH_COUNT] = [
    GlyphDefinition { letter: "ą", bitmap: [0x00, 0x00, 0x0e, 0x01, 0x0f, 0x11, 0x0e, 0x01] },
    GlyphDefinition { letter: "Ą", bitmap: [0x0e, 0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x02] },
    GlyphDefinition { letter: "č", bitmap: [0x0a, 0x04, 0x0e, 0x10, 0x10, 0x10, 0x0e, 0x00] },
    GlyphDefinition { letter: "Č", bitmap: [0x0a, 0x04, 0x0e, 0x10, 0x10, 0x10, 0x0e, 0x00] },
    GlyphDefinition { letter: "ę", bitmap: [0x00, 0x00, 0x0e, 0x11, 0x1f, 0x10, 0x0e, 0x01] },
    GlyphDefinition { letter: "Ę", bitmap: [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f, 0x01] },
    GlyphDefinition { letter: "ė", bitmap: [0x04, 0x00, 0x0e, 0x11, 0x1f, 0x10, 0x0e, 0x00] },
    GlyphDefinition { letter: "Ė", bitmap: [0x04, 0x00, 0x1f, 0x10, 0x1e, 0x10, 0x1f, 0x00] },
    GlyphDefinition { letter: "į", bitmap: [0x04, 0x00, 0x04, 0x04, 0x04, 0x04, 0x04, 0x02] },
    GlyphDefinition { letter: "Į", bitmap: [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x02] },
    GlyphDefinition { letter: "š", bitmap: [0x0a, 0x04, 0x0e, 0x10, 0x0e, 0x01, 0x0e, 0x00] },
    GlyphDefinition { letter: "Š", bitmap: [0x0a, 0x04, 0x0e, 0x10, 0x0e, 0x01, 0x0e, 0x00] },
    GlyphDefinition { letter: "ų", bitmap: [0x00, 0x00, 0x11, 0x11, 0x11, 0x11, 0x0e, 0x01] },
    GlyphDefinition { letter: "Ų", bitmap: [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e, 0x01] },
    GlyphDefinition { letter: "ū", bitmap: [0x0e, 0x00, 0x11, 0x11, 0x11, 0x11, 0x0e, 0x00] },
    GlyphDefinition { letter: "Ū", bitmap: [0x0e, 0x00, 0x11, 0x11, 0x11, 0x11, 0x0e, 0x00] },
    GlyphDefinition { letter: "ž", bitmap: [0x0a, 0x04, 0x1f, 0x02, 0x04, 0x08, 0x1f, 0x00] },
    GlyphDefinition { letter: "Ž", bitmap: [0x0a, 0x04, 0x1f, 0x02, 0x04, 0x08, 0x1f, 0x00] },
];

/// Index into [`GLYPHS`] of the letter `text` starts with
///
/// Only whole encodings match: a lone lead byte or a different
/// continuation byte resolves to `None`.
pub fn find_known_letter(text: &[u8]) -> Option<usize> {
    GLYPHS
        .iter()
        .position(|g| text.starts_with(g.letter.as_bytes()))
}

/// Definition at `index`, if any
pub fn glyph(index: usize) -> Option<&'static GlyphDefinition> {
    GLYPHS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::sequence_len;

    #[test]
    fn test_every_letter_resolves_to_itself() {
        for (i, g) in GLYPHS.iter().enumerate() {
            let found = find_known_letter(g.letter.as_bytes());
            assert_eq!(found, Some(i), "letter {}", g.letter);
            assert_eq!(glyph(i).unwrap().bitmap, g.bitmap);
        }
    }

    #[test]
    fn test_match_ignores_trailing_text() {
        assert_eq!(find_known_letter("žodis".as_bytes()), Some(16));
        assert_eq!(find_known_letter("Ąžuolas".as_bytes()), Some(1));
    }

    #[test]
    fn test_non_letters_resolve_to_none() {
        assert_eq!(find_known_letter(b"a"), None);
        assert_eq!(find_known_letter(b""), None);
        assert_eq!(find_known_letter("ö".as_bytes()), None);
        assert_eq!(find_known_letter("€".as_bytes()), None);
        // Lead byte of ą without its continuation
        assert_eq!(find_known_letter(&[0xC4]), None);
        assert_eq!(find_known_letter(&[0xC4, b'a']), None);
    }

    #[test]
    fn test_table_shape() {
        assert_eq!(GLYPHS.len(), 18);
        for g in GLYPHS.iter() {
            let bytes = g.letter.as_bytes();
            assert_eq!(bytes.len(), 2);
            assert_eq!(sequence_len(bytes[0]), 2);
            assert!(g.bitmap.iter().all(|row| row & !0x1f == 0));
        }
    }

    #[test]
    fn test_letters_are_unique() {
        for (i, a) in GLYPHS.iter().enumerate() {
            for b in GLYPHS.iter().skip(i + 1) {
                assert_ne!(a.letter, b.letter);
            }
        }
    }
}
