//! Host model of the guest's trap-time collaborators.

use rvsys_ecall::{AccessFault, Platform};
use tracing::trace;

use crate::memory::FlatMemory;

/// Guest memory plus a recording logger peripheral.
///
/// Logger bytes are collected rather than printed so callers decide where
/// the guest's console goes.
pub struct HostPlatform {
    memory: FlatMemory,
    console: Vec<u8>,
    resume_advance: u64,
    halt_signals: u32,
}

impl HostPlatform {
    #[must_use]
    pub const fn new(memory: FlatMemory) -> Self {
        Self {
            memory,
            console: Vec::new(),
            resume_advance: 0,
            halt_signals: 0,
        }
    }

    #[must_use]
    pub const fn memory(&self) -> &FlatMemory {
        &self.memory
    }

    pub const fn memory_mut(&mut self) -> &mut FlatMemory {
        &mut self.memory
    }

    /// Bytes stored to the logger so far.
    #[must_use]
    pub fn console(&self) -> &[u8] {
        &self.console
    }

    /// Drain the logger output.
    pub fn take_console(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.console)
    }

    /// Total bytes the resume address was advanced by.
    #[must_use]
    pub const fn resume_advance(&self) -> u64 {
        self.resume_advance
    }

    /// Number of times the guest signalled the host to stop.
    #[must_use]
    pub const fn halt_signals(&self) -> u32 {
        self.halt_signals
    }
}

impl Platform for HostPlatform {
    fn logger_write(&mut self, byte: u8) {
        self.console.push(byte);
    }

    fn check_guest_range(&self, addr: u32, len: u32) -> Result<(), AccessFault> {
        if self.memory.contains(addr, u64::from(len)) {
            Ok(())
        } else {
            Err(AccessFault { addr, len })
        }
    }

    fn load_guest_u8(&self, addr: u32) -> Result<u8, AccessFault> {
        self.memory
            .read(addr, 1)
            .map(|bytes| bytes[0])
            .map_err(|_| AccessFault { addr, len: 1 })
    }

    fn store_guest(&mut self, addr: u32, bytes: &[u8]) -> Result<(), AccessFault> {
        #[allow(clippy::cast_possible_truncation)]
        let len = bytes.len() as u32;
        self.memory
            .write(addr, bytes)
            .map_err(|_| AccessFault { addr, len })
    }

    fn advance_resume_address(&mut self, delta: u32) {
        trace!(delta, "advance resume address");
        self.resume_advance += u64::from(delta);
    }

    fn signal_host_halt(&mut self) {
        trace!("host halt signalled");
        self.halt_signals += 1;
    }
}
