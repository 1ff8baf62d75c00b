//! Scroll renderer
//!
//! Draws a message frame by frame. Each frame starts from a cleared display
//! and an empty glyph pool, loads the glyphs the top row needs, prints it,
//! then does the same for the bottom row. The first failure ends the whole
//! render: a half-drawn marquee is not worth continuing.

use embedded_hal_async::delay::DelayNs;

use crate::config::DisplayConfig;
use crate::error::{Operation, ProtocolError, RenderError, ResultExt};
use crate::glyph::{GlyphPool, LoadReport};
use crate::message::{Line, Message};
use crate::scroll::{scroll_steps, Frame};
use crate::traits::{initialize_with_retry, CharacterLcd};

/// Outcome of a completed render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderSummary {
    /// Frames drawn
    pub steps: usize,
    /// CGRAM slots programmed across all frames
    pub glyphs_loaded: u32,
    /// Letter occurrences that found the pool full
    pub glyphs_skipped: u32,
}

impl RenderSummary {
    fn add(&mut self, report: LoadReport) {
        self.glyphs_loaded += u32::from(report.loaded);
        self.glyphs_skipped += u32::from(report.overflowed);
    }
}

/// Timed marquee renderer over a character LCD
pub struct ScrollRenderer<L, D> {
    lcd: L,
    delay: D,
    pool: GlyphPool,
    config: DisplayConfig,
}

impl<L: CharacterLcd, D: DelayNs> ScrollRenderer<L, D> {
    /// Create a renderer
    ///
    /// `delay` paces frames and init retries; the LCD keeps its own for
    /// bus timing.
    pub fn new(lcd: L, delay: D, config: DisplayConfig) -> Self {
        Self {
            lcd,
            delay,
            pool: GlyphPool::new(),
            config,
        }
    }

    /// Bring the controller up using the configured retry policy
    ///
    /// Returns the attempt that succeeded.
    pub async fn attach(&mut self) -> Result<u8, ProtocolError> {
        let attempt = initialize_with_retry(
            &mut self.lcd,
            &mut self.delay,
            self.config.init_attempts,
            self.config.init_cooldown_ms,
        )
        .await?;
        self.pool.reset();
        Ok(attempt)
    }

    /// Show `message`, scrolling it if it does not fit
    pub async fn render(&mut self, message: &Message) -> Result<RenderSummary, RenderError> {
        let cells = message.cell_count();
        let steps = scroll_steps(cells);
        debug!(
            "Render: {} bytes, {} cells, {} steps",
            message.len(),
            cells,
            steps
        );

        let mut summary = RenderSummary::default();
        for step in 0..steps {
            let frame = Frame::at(message, step)?;
            self.draw_frame(&frame, &mut summary).await?;
            summary.steps += 1;
            self.delay.delay_ms(self.config.frame_dwell_ms).await;
        }

        if summary.glyphs_skipped > 0 {
            warn!("{} letters had no free glyph slot", summary.glyphs_skipped);
        }
        Ok(summary)
    }

    async fn draw_frame(
        &mut self,
        frame: &Frame,
        summary: &mut RenderSummary,
    ) -> Result<(), ProtocolError> {
        self.lcd.clear().await.during(Operation::Clear)?;
        self.pool.reset();

        for (row, line) in frame.rows() {
            let report = self.pool.load_for_line(&mut self.lcd, line.cells()).await?;
            summary.add(report);

            self.lcd
                .set_cursor(row, 0)
                .await
                .during(Operation::SetCursor)?;
            self.print_line(line, row).await?;
        }
        Ok(())
    }

    /// Print a row at the current cursor position
    ///
    /// Each character gets `print_retries` extra attempts before the row is
    /// abandoned.
    pub async fn print_line(&mut self, line: &Line, row: u8) -> Result<(), ProtocolError> {
        let attempts = u16::from(self.config.print_retries) + 1;

        for cell in line.cells() {
            let code = self.pool.resolve_for_print(cell, self.config.unmapped);

            let mut attempt = 1;
            loop {
                match self.lcd.write_data(code).await {
                    Ok(()) => break,
                    Err(e) if attempt >= attempts => {
                        error!("Row {} character {} failed {} times", row, code, attempts);
                        return Err(ProtocolError::new(Operation::PrintLine(row), e));
                    }
                    Err(_) => {
                        trace!("Retrying character {} (attempt {})", code, attempt);
                        attempt += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Glyph slots of the last drawn frame
    pub fn pool(&self) -> &GlyphPool {
        &self.pool
    }

    /// Active configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Underlying display
    pub fn lcd_mut(&mut self) -> &mut L {
        &mut self.lcd
    }

    /// Take the display and delay back
    pub fn release(self) -> (L, D) {
        (self.lcd, self.delay)
    }
}
