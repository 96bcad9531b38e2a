//! The hart itself as a [`Platform`].

use rvsys_ecall::{AccessFault, Platform};

/// Memory-mapped logger: every byte stored here is printed by the host.
pub const LOGGER_ADDR: usize = 0x8000_0000;

/// Platform for code running on the target.
///
/// Guest memory is the hart's own address space, so only ranges that wrap
/// past the top of the 32-bit space are rejected. A bad pointer faults the
/// same way it would in the program that passed it.
pub struct BarePlatform {
    logger: *mut u8,
}

impl BarePlatform {
    /// Platform writing to the logger at [`LOGGER_ADDR`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            logger: LOGGER_ADDR as *mut u8,
        }
    }

    /// Platform writing to a different logger register.
    ///
    /// # Safety
    ///
    /// `logger` must be valid for volatile byte writes for as long as the
    /// platform is used.
    #[must_use]
    pub const unsafe fn with_logger(logger: *mut u8) -> Self {
        Self { logger }
    }
}

impl Default for BarePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for BarePlatform {
    fn logger_write(&mut self, byte: u8) {
        // SAFETY: `logger` is the MMIO logger or satisfies `with_logger`'s contract.
        unsafe { self.logger.write_volatile(byte) }
    }

    fn check_guest_range(&self, addr: u32, len: u32) -> Result<(), AccessFault> {
        if len > 0 && addr.checked_add(len - 1).is_none() {
            return Err(AccessFault { addr, len });
        }
        Ok(())
    }

    fn load_guest_u8(&self, addr: u32) -> Result<u8, AccessFault> {
        // SAFETY: the program handed us this address as a syscall buffer.
        Ok(unsafe { (addr as usize as *const u8).read_volatile() })
    }

    fn store_guest(&mut self, addr: u32, bytes: &[u8]) -> Result<(), AccessFault> {
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        self.check_guest_range(addr, len)?;
        // SAFETY: as above; `bytes` lives on the handler's stack, not in the target buffer.
        unsafe {
            core::ptr::copy_nonoverlapping(bytes.as_ptr(), addr as usize as *mut u8, bytes.len());
        }
        Ok(())
    }

    fn advance_resume_address(&mut self, delta: u32) {
        #[cfg(target_arch = "riscv32")]
        // SAFETY: only runs in the trap handler, where mepc is the return address.
        unsafe {
            core::arch::asm!(
                "csrr {tmp}, mepc",
                "add {tmp}, {tmp}, {delta}",
                "csrw mepc, {tmp}",
                tmp = out(reg) _,
                delta = in(reg) delta,
            );
        }

        #[cfg(not(target_arch = "riscv32"))]
        let _ = delta;
    }

    fn signal_host_halt(&mut self) {
        // The simulator stops at the first ebreak.
        #[cfg(target_arch = "riscv32")]
        // SAFETY: ebreak has no operands and touches no memory.
        unsafe {
            core::arch::asm!("ebreak");
        }
    }
}
