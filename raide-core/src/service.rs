//! Display service
//!
//! Accepts text from any context and hands it to a single render worker.
//! At most one render cycle is in flight: while it runs, new submissions
//! are rejected rather than queued, and the pending slot is left alone.
//!
//! The service is meant to live in a `static`, shared by reference between
//! submitters and the worker task:
//!
//! ```ignore
//! static DISPLAY: DisplayService<CriticalSectionRawMutex> = DisplayService::new();
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use portable_atomic::{AtomicBool, Ordering};

use crate::error::{RenderError, SubmitError};
use crate::message::{Message, MAX_MESSAGE_LEN};
use crate::scroll::{RenderSummary, ScrollRenderer};
use crate::traits::CharacterLcd;

/// Busy flag plus single-slot hand-off to the render worker
pub struct DisplayService<M: RawMutex> {
    busy: AtomicBool,
    pending: Channel<M, Message, 1>,
    idle: Signal<M, ()>,
}

impl<M: RawMutex> Default for DisplayService<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> DisplayService<M> {
    /// Idle service with nothing pending
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            pending: Channel::new(),
            idle: Signal::new(),
        }
    }

    /// Whether a render cycle is scheduled or running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Schedule `text` for display
    ///
    /// Returns the number of bytes accepted (at most [`MAX_MESSAGE_LEN`]).
    /// Text that is empty up to its first NUL is accepted without
    /// scheduling anything.
    pub fn submit(&self, text: &[u8]) -> Result<usize, SubmitError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit rejected, render in progress");
            return Err(SubmitError::Busy);
        }

        let accepted = text.len().min(MAX_MESSAGE_LEN);
        let message = Message::from_bytes(text);
        if message.is_empty() {
            self.busy.store(false, Ordering::Release);
            return Ok(accepted);
        }

        // Only the flag's winner sends, and the worker empties the slot
        // before it clears the flag
        if self.pending.try_send(message).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(SubmitError::Busy);
        }

        trace!("Submitted {} bytes", accepted);
        Ok(accepted)
    }

    /// Render whatever is pending, without waiting for a submission
    ///
    /// Returns `None` when nothing was scheduled.
    pub async fn render_pending<L, D>(
        &self,
        renderer: &mut ScrollRenderer<L, D>,
    ) -> Option<Result<RenderSummary, RenderError>>
    where
        L: CharacterLcd,
        D: DelayNs,
    {
        let message = self.pending.try_receive().ok()?;
        Some(self.run(renderer, message).await)
    }

    /// Render worker loop, never returns
    ///
    /// Must be the only consumer of this service.
    pub async fn serve<L, D>(&self, renderer: &mut ScrollRenderer<L, D>)
    where
        L: CharacterLcd,
        D: DelayNs,
    {
        info!("Display worker started");
        loop {
            let message = self.pending.receive().await;
            let _ = self.run(renderer, message).await;
        }
    }

    /// Wait until no render cycle is in flight
    ///
    /// Supports a single waiting task.
    pub async fn drain(&self) {
        while self.is_busy() {
            self.idle.wait().await;
        }
    }

    async fn run<L, D>(
        &self,
        renderer: &mut ScrollRenderer<L, D>,
        message: Message,
    ) -> Result<RenderSummary, RenderError>
    where
        L: CharacterLcd,
        D: DelayNs,
    {
        let _guard = BusyGuard { service: self };

        let result = renderer.render(&message).await;
        match &result {
            Ok(summary) => info!(
                "Rendered {} frames ({} glyphs, {} skipped)",
                summary.steps,
                summary.glyphs_loaded,
                summary.glyphs_skipped
            ),
            Err(e) => error!("Render failed: {:?}", e),
        }
        result
    }
}

/// Clears the busy flag when the cycle ends, however it ends
struct BusyGuard<'a, M: RawMutex> {
    service: &'a DisplayService<M>,
}

impl<M: RawMutex> Drop for BusyGuard<'_, M> {
    fn drop(&mut self) {
        self.service.busy.store(false, Ordering::Release);
        self.service.idle.signal(());
    }
}
