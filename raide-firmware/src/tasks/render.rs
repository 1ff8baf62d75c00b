//! Render worker task
//!
//! Brings the LCD up, then renders submitted messages one at a time.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use portable_atomic::Ordering;

use raide_core::ScrollRenderer;
use raide_drivers::Hd44780;
use raide_hal::I2cExpander;

use crate::channels::{DISPLAY, DISPLAY_ONLINE};

/// LCD on the I2C0 backpack
pub type Lcd = Hd44780<I2cExpander<I2c<'static, I2C0, Async>>, Delay>;

/// Renderer owned by the worker task
pub type Renderer = ScrollRenderer<Lcd, Delay>;

/// Render task - owns the LCD for the lifetime of the firmware
#[embassy_executor::task]
pub async fn render_task(mut renderer: Renderer) {
    info!("Render task started");

    match renderer.attach().await {
        Ok(attempt) => info!("LCD initialized on attempt {}", attempt),
        Err(e) => {
            error!("LCD did not answer, display disabled: {:?}", e);
            return;
        }
    }

    DISPLAY_ONLINE.store(true, Ordering::Release);
    DISPLAY.serve(&mut renderer).await;
}
