//! Message and line buffers
//!
//! Text arrives as raw bytes that are expected to be UTF-8 but are never
//! validated: the controller only cares about one byte per column. A text is
//! walked as *cells*, one UTF-8 sequence each, with the sequence length read
//! from the leading byte. Malformed input degrades to single-byte cells
//! instead of failing.

use heapless::Vec;

use crate::LCD_COLS;

/// Longest accepted message in bytes
pub const MAX_MESSAGE_LEN: usize = 511;

/// Longest UTF-8 sequence
pub const MAX_CELL_LEN: usize = 4;

/// Bytes needed for one full line of cells
pub const LINE_CAPACITY: usize = LCD_COLS * MAX_CELL_LEN;

/// Length of the UTF-8 sequence starting with `lead`
///
/// Continuation and invalid lead bytes count as one-byte sequences.
pub const fn sequence_len(lead: u8) -> usize {
    if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Iterator over the cells of a byte string
#[derive(Clone)]
pub struct Cells<'a> {
    rest: &'a [u8],
}

impl<'a> Cells<'a> {
    /// Walk `text` cell by cell
    pub fn new(text: &'a [u8]) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Cells<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let lead = *self.rest.first()?;
        let len = sequence_len(lead).min(self.rest.len());
        let (cell, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(cell)
    }
}

/// A pending message, consumed once by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    bytes: Vec<u8, MAX_MESSAGE_LEN>,
}

impl Message {
    /// Empty message
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy submitted bytes into a message
    ///
    /// Keeps at most [`MAX_MESSAGE_LEN`] bytes and stops at the first NUL.
    pub fn from_bytes(text: &[u8]) -> Self {
        let text = &text[..text.len().min(MAX_MESSAGE_LEN)];
        let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());

        let mut bytes = Vec::new();
        // Cannot fail: `end` is within capacity
        let _ = bytes.extend_from_slice(&text[..end]);
        Self { bytes }
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Walk the message cell by cell
    pub fn cells(&self) -> Cells<'_> {
        Cells::new(&self.bytes)
    }

    /// Number of display columns the message occupies
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }
}

/// Error returned when a line's buffer is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineFull;

/// One display row: exactly [`LCD_COLS`] cells once padded
///
/// Cell boundaries are recorded as cells are pushed, so a clamped tail cell
/// stays one column even when padding follows it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    bytes: Vec<u8, LINE_CAPACITY>,
    ends: Vec<u8, LCD_COLS>,
}

impl Line {
    /// Empty line
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            ends: Vec::new(),
        }
    }

    /// Build a line from up to [`LCD_COLS`] cells, space padded
    pub fn from_cells<'a, I>(cells: I) -> Result<Self, LineFull>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut line = Self::new();
        for cell in cells.into_iter().take(LCD_COLS) {
            line.push_cell(cell)?;
        }
        line.pad()?;
        Ok(line)
    }

    /// Append one cell
    pub fn push_cell(&mut self, cell: &[u8]) -> Result<(), LineFull> {
        if self.ends.is_full() {
            return Err(LineFull);
        }
        self.bytes.extend_from_slice(cell).map_err(|_| LineFull)?;
        // LINE_CAPACITY fits in a u8
        self.ends.push(self.bytes.len() as u8).map_err(|_| LineFull)
    }

    /// Fill the remaining columns with spaces
    pub fn pad(&mut self) -> Result<(), LineFull> {
        while !self.ends.is_full() {
            self.push_cell(b" ")?;
        }
        Ok(())
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Walk the line cell by cell, as pushed
    pub fn cells(&self) -> LineCells<'_> {
        LineCells {
            bytes: &self.bytes,
            ends: self.ends.iter(),
            start: 0,
        }
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.ends.len()
    }

    /// Text view, if the bytes are valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }
}

/// Iterator over the cells of a [`Line`]
#[derive(Clone)]
pub struct LineCells<'a> {
    bytes: &'a [u8],
    ends: core::slice::Iter<'a, u8>,
    start: usize,
}

impl<'a> Iterator for LineCells<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let end = usize::from(*self.ends.next()?);
        let cell = self.bytes.get(self.start..end)?;
        self.start = end;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ends.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_len_patterns() {
        assert_eq!(sequence_len(b'a'), 1);
        assert_eq!(sequence_len(0xC4), 2); // ą, Ą, č, Č, ę, Ę, ė, Ė, į, Į
        assert_eq!(sequence_len(0xC5), 2); // š, Š, ų, Ų, ū, Ū, ž, Ž
        assert_eq!(sequence_len(0xE2), 3); // €
        assert_eq!(sequence_len(0xF0), 4); // emoji
        assert_eq!(sequence_len(0x85), 1); // stray continuation byte
    }

    #[test]
    fn test_cells_follow_codepoints() {
        let text = "aą€😀".as_bytes();
        let cells: std::vec::Vec<&[u8]> = Cells::new(text).collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], b"a");
        assert_eq!(cells[1], "ą".as_bytes());
        assert_eq!(cells[2], "€".as_bytes());
        assert_eq!(cells[3], "😀".as_bytes());
    }

    #[test]
    fn test_truncated_sequence_is_clamped() {
        let text = [b'x', 0xC4];
        let cells: std::vec::Vec<&[u8]> = Cells::new(&text).collect();
        assert_eq!(cells, [&[b'x'][..], &[0xC4][..]]);
    }

    #[test]
    fn test_message_truncates_and_stops_at_nul() {
        let long = [b'a'; 600];
        assert_eq!(Message::from_bytes(&long).len(), MAX_MESSAGE_LEN);

        let with_nul = b"labas\0vakaras";
        assert_eq!(Message::from_bytes(with_nul).as_bytes(), b"labas");

        assert!(Message::from_bytes(b"\0abc").is_empty());
    }

    #[test]
    fn test_message_cell_count() {
        let msg = Message::from_bytes("ąčę".as_bytes());
        assert_eq!(msg.len(), 6);
        assert_eq!(msg.cell_count(), 3);
    }

    #[test]
    fn test_line_pads_to_width() {
        let line = Line::from_cells(Cells::new(b"labas")).unwrap();
        assert_eq!(line.as_bytes(), b"labas           ");
        assert_eq!(line.cell_count(), LCD_COLS);
    }

    #[test]
    fn test_line_takes_sixteen_cells_of_multibyte_text() {
        let text = "ąĄčČęĘėĖįĮšŠųŲūŪžŽ";
        let line = Line::from_cells(Cells::new(text.as_bytes())).unwrap();
        assert_eq!(line.cell_count(), 16);
        assert_eq!(line.as_str(), Some("ąĄčČęĘėĖįĮšŠųŲūŪ"));
    }

    #[test]
    fn test_clamped_tail_cell_keeps_its_column() {
        let msg = Message::from_bytes(&[b'a', b'b', 0xC4]);
        let line = Line::from_cells(msg.cells()).unwrap();

        let cells: std::vec::Vec<&[u8]> = line.cells().collect();
        assert_eq!(line.cell_count(), LCD_COLS);
        assert_eq!(cells.len(), LCD_COLS);
        assert_eq!(cells[2], &[0xC4][..]);
        assert_eq!(cells[3], b" ");
    }

    #[test]
    fn test_line_rejects_seventeenth_cell() {
        let mut line = Line::from_cells(Cells::new(b"")).unwrap();
        assert_eq!(line.push_cell(b"x"), Err(LineFull));
    }
}
