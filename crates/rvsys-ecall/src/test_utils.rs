//! Recording platform for unit tests.

use std::vec;
use std::vec::Vec;

use crate::platform::{AccessFault, Platform};

pub const MEM_BASE: u32 = 0x4000;
pub const MEM_SIZE: u32 = 0x1000;

/// Platform that keeps guest memory in a vector and records every
/// collaborator call.
pub struct MockPlatform {
    pub memory: Vec<u8>,
    pub logger: Vec<u8>,
    pub resume_advances: Vec<u32>,
    pub halt_signals: usize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEM_SIZE as usize],
            logger: Vec::new(),
            resume_advances: Vec::new(),
            halt_signals: 0,
        }
    }

    /// Place `bytes` in guest memory at `addr`.
    pub fn poke(&mut self, addr: u32, bytes: &[u8]) {
        let off = (addr - MEM_BASE) as usize;
        self.memory[off..off + bytes.len()].copy_from_slice(bytes);
    }

    pub fn peek(&self, addr: u32, len: usize) -> &[u8] {
        let off = (addr - MEM_BASE) as usize;
        &self.memory[off..off + len]
    }

    pub fn logger_str(&self) -> &str {
        std::str::from_utf8(&self.logger).expect("non-utf-8 logger")
    }

    fn offset(&self, addr: u32, len: u32) -> Result<usize, AccessFault> {
        let fault = AccessFault { addr, len };
        let end = addr.checked_add(len).ok_or(fault)?;
        if addr < MEM_BASE || end > MEM_BASE + MEM_SIZE {
            return Err(fault);
        }
        Ok((addr - MEM_BASE) as usize)
    }
}

impl Platform for MockPlatform {
    fn logger_write(&mut self, byte: u8) {
        self.logger.push(byte);
    }

    fn check_guest_range(&self, addr: u32, len: u32) -> Result<(), AccessFault> {
        self.offset(addr, len).map(|_| ())
    }

    fn load_guest_u8(&self, addr: u32) -> Result<u8, AccessFault> {
        let off = self.offset(addr, 1)?;
        Ok(self.memory[off])
    }

    fn store_guest(&mut self, addr: u32, bytes: &[u8]) -> Result<(), AccessFault> {
        let off = self.offset(addr, bytes.len() as u32)?;
        self.memory[off..off + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn advance_resume_address(&mut self, delta: u32) {
        self.resume_advances.push(delta);
    }

    fn signal_host_halt(&mut self) {
        self.halt_signals += 1;
    }
}
