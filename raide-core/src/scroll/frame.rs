//! Frame windowing
//!
//! Both rows follow one rule: a row shows exactly 16 cells of the message
//! starting at its offset, padded with spaces. The second row only exists
//! while the message still has text past the first row.

use crate::error::RenderError;
use crate::message::{Line, Message};
use crate::LCD_COLS;

/// What the display shows during one scroll step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Top row
    pub line1: Line,
    /// Bottom row, absent when the message ends within the top row
    pub line2: Option<Line>,
}

impl Frame {
    /// Frame for scroll step `step` of `message`
    pub fn at(message: &Message, step: usize) -> Result<Self, RenderError> {
        let line1 = Line::from_cells(message.cells().skip(step))
            .map_err(|_| RenderError::Allocation)?;

        let line2 = if message.cell_count() > step + LCD_COLS {
            let line = Line::from_cells(message.cells().skip(step + LCD_COLS))
                .map_err(|_| RenderError::Allocation)?;
            Some(line)
        } else {
            None
        };

        Ok(Self { line1, line2 })
    }

    /// Rows to print, paired with their row index
    pub fn rows(&self) -> impl Iterator<Item = (u8, &Line)> {
        core::iter::once((0, &self.line1)).chain(self.line2.as_ref().map(|line| (1, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Cells;
    use crate::scroll::scroll_steps;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn frame(text: &str, step: usize) -> Frame {
        Frame::at(&Message::from_bytes(text.as_bytes()), step).unwrap()
    }

    #[test]
    fn test_short_message_single_line() {
        let f = frame("labas", 0);
        assert_eq!(f.line1.as_str(), Some("labas           "));
        assert!(f.line2.is_none());
        assert_eq!(f.rows().count(), 1);
    }

    #[test]
    fn test_exactly_one_row_has_no_second_line() {
        let f = frame("0123456789abcdef", 0);
        assert_eq!(f.line1.as_str(), Some("0123456789abcdef"));
        assert!(f.line2.is_none());
    }

    #[test]
    fn test_second_line_padded() {
        let f = frame("0123456789abcdefXYZ", 0);
        assert_eq!(f.line2.unwrap().as_str(), Some("XYZ             "));
    }

    #[test]
    fn test_window_slides_by_cells() {
        let text = "ąĄabcdefghijklmnopqrstuvwxyzABCDE";
        let f = frame(text, 1);
        assert_eq!(f.line1.as_str(), Some("Ąabcdefghijklmno"));
        assert_eq!(f.line2.as_ref().unwrap().as_str(), Some("pqrstuvwxyzABCDE"));

        let rows: Vec<u8> = f.rows().map(|(row, _)| row).collect();
        assert_eq!(rows, [0, 1]);
    }

    #[test]
    fn test_empty_message_is_blank_row() {
        let f = frame("", 0);
        assert_eq!(f.line1.as_bytes(), [b' '; 16]);
        assert!(f.line2.is_none());
    }

    proptest! {
        #[test]
        fn test_windows_are_padded_substrings(text in "[a-zA-Z0-9 ąčęėįšųūžĄŽ]{0,80}") {
            let message = Message::from_bytes(text.as_bytes());
            let cells: Vec<&[u8]> = Cells::new(message.as_bytes()).collect();
            let n = cells.len();

            let steps = scroll_steps(n);
            if n <= 32 {
                prop_assert_eq!(steps, 1);
            } else {
                prop_assert_eq!(steps, n - 31);
            }

            for step in 0..steps {
                let f = Frame::at(&message, step).unwrap();

                let row1: Vec<&[u8]> = f.line1.cells().collect();
                prop_assert_eq!(row1.len(), 16);
                for (i, cell) in row1.iter().enumerate() {
                    let expected: &[u8] = cells.get(step + i).copied().unwrap_or(b" ");
                    prop_assert_eq!(*cell, expected);
                }

                prop_assert_eq!(f.line2.is_some(), n > step + 16);
                if let Some(line2) = &f.line2 {
                    let row2: Vec<&[u8]> = line2.cells().collect();
                    prop_assert_eq!(row2.len(), 16);
                    for (i, cell) in row2.iter().enumerate() {
                        let expected: &[u8] = cells.get(step + 16 + i).copied().unwrap_or(b" ");
                        prop_assert_eq!(*cell, expected);
                    }
                }
            }
        }
    }
}
