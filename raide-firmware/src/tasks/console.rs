//! UART console task
//!
//! Every newline-terminated line received on UART0 is submitted to the
//! display. Each line gets a one-line reply:
//!
//! - `OK <n>` - accepted, `n` bytes will be shown
//! - `BUSY` - a message is still scrolling, nothing was changed
//! - `ERR` - the display is offline or the line was not received intact

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUart;
use embedded_io_async::{Read, Write};
use heapless::{String, Vec};
use portable_atomic::Ordering;

use raide_core::{SubmitError, MAX_MESSAGE_LEN};

use crate::channels::{DISPLAY, DISPLAY_ONLINE};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Console task - turns UART lines into display submissions
#[embassy_executor::task]
pub async fn console_task(mut uart: BufferedUart) {
    info!("Console task started");

    let mut line: Vec<u8, MAX_MESSAGE_LEN> = Vec::new();
    let mut overflowed = false;
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match uart.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                line.clear();
                overflowed = false;
                reply(&mut uart, b"ERR\n").await;
                continue;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            match byte {
                b'\n' => {
                    if overflowed {
                        debug!("Line longer than {} bytes truncated", MAX_MESSAGE_LEN);
                    }
                    let response = submit_line(&line);
                    reply(&mut uart, response.as_bytes()).await;
                    line.clear();
                    overflowed = false;
                }
                b'\r' => {}
                _ => {
                    if line.push(byte).is_err() {
                        overflowed = true;
                    }
                }
            }
        }
    }
}

/// Submit one received line and build the reply for it
fn submit_line(line: &[u8]) -> String<16> {
    let mut response = String::new();

    if !DISPLAY_ONLINE.load(Ordering::Acquire) {
        let _ = response.push_str("ERR\n");
        return response;
    }

    match DISPLAY.submit(line) {
        Ok(accepted) => {
            let _ = writeln!(response, "OK {}", accepted);
        }
        Err(SubmitError::Busy) => {
            let _ = response.push_str("BUSY\n");
        }
    }
    response
}

async fn reply(uart: &mut BufferedUart, bytes: &[u8]) {
    if let Err(e) = uart.write_all(bytes).await {
        warn!("UART write error: {:?}", e);
    }
}
