//! Recording fakes for host tests

use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use raide_hal::BusError;

use crate::traits::{cmd, CharacterLcd};

/// One successful controller transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Init,
    Command(u8),
    Data(u8),
}

/// Character LCD that records what it was sent
pub struct FakeLcd {
    pub ops: Vec<Op>,
    pub init_calls: usize,
    /// Fail this many `initialize` calls before succeeding
    pub init_failures: usize,
    /// Fail writes of this data byte, `remaining` times
    pub fail_data: Option<(u8, usize)>,
    /// Fail this command, `remaining` times
    pub fail_command: Option<(u8, usize)>,
    /// Failed data writes so far
    pub failed_data_writes: usize,
}

impl FakeLcd {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            init_calls: 0,
            init_failures: 0,
            fail_data: None,
            fail_command: None,
            failed_data_writes: 0,
        }
    }

    /// All data bytes written, in order
    pub fn data_bytes(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// Data bytes written right after `command`, up to the next command
    ///
    /// Uses the last occurrence of `command`.
    pub fn data_after(&self, command: u8) -> Vec<u8> {
        let start = match self.ops.iter().rposition(|op| *op == Op::Command(command)) {
            Some(pos) => pos + 1,
            None => return Vec::new(),
        };
        self.ops[start..]
            .iter()
            .take_while(|op| matches!(op, Op::Data(_)))
            .filter_map(|op| match op {
                Op::Data(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// Number of times `command` was sent
    pub fn count_command(&self, command: u8) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == Op::Command(command))
            .count()
    }

    /// Number of CGRAM slot programming commands sent
    pub fn glyph_definitions(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Command(c) if *c & 0xC0 == cmd::SET_CGRAM_ADDR))
            .count()
    }
}

fn take_failure(slot: &mut Option<(u8, usize)>, value: u8) -> bool {
    match slot {
        Some((v, remaining)) if *v == value && *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}

impl CharacterLcd for FakeLcd {
    async fn initialize(&mut self) -> Result<(), BusError> {
        self.init_calls += 1;
        if self.init_failures > 0 {
            self.init_failures -= 1;
            return Err(BusError::Nack);
        }
        self.ops.push(Op::Init);
        Ok(())
    }

    async fn command(&mut self, cmd: u8) -> Result<(), BusError> {
        if take_failure(&mut self.fail_command, cmd) {
            return Err(BusError::Nack);
        }
        self.ops.push(Op::Command(cmd));
        Ok(())
    }

    async fn write_data(&mut self, byte: u8) -> Result<(), BusError> {
        if take_failure(&mut self.fail_data, byte) {
            self.failed_data_writes += 1;
            return Err(BusError::Nack);
        }
        self.ops.push(Op::Data(byte));
        Ok(())
    }
}

/// Delay that only adds up what it was asked to wait
pub struct FakeDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self {
            total_ns: 0,
            calls: 0,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_ns += us as u64 * 1_000;
        self.calls += 1;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.calls += 1;
    }
}
