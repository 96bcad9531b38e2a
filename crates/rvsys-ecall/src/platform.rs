//! Hardware collaborators of the trap handler.

/// Guest range that could not be accessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessFault {
    pub addr: u32,
    pub len: u32,
}

/// Everything the dispatcher needs from the machine it runs on.
///
/// On target this is CSR writes, volatile MMIO stores and raw pointers.
/// The host emulator records each call instead.
pub trait Platform {
    /// Store one byte to the memory-mapped logger.
    fn logger_write(&mut self, byte: u8);

    /// Check that `len` bytes starting at `addr` are accessible.
    ///
    /// # Errors
    ///
    /// Returns the faulting range if any byte is outside guest memory.
    fn check_guest_range(&self, addr: u32, len: u32) -> Result<(), AccessFault>;

    /// Load one byte of guest memory.
    ///
    /// # Errors
    ///
    /// Returns the faulting address if it is outside guest memory.
    fn load_guest_u8(&self, addr: u32) -> Result<u8, AccessFault>;

    /// Store bytes into guest memory.
    ///
    /// # Errors
    ///
    /// Returns the faulting range; nothing is stored in that case.
    fn store_guest(&mut self, addr: u32, bytes: &[u8]) -> Result<(), AccessFault>;

    /// Move the trap return address forward by `delta` bytes.
    fn advance_resume_address(&mut self, delta: u32);

    /// Tell the host simulator the program has terminated.
    fn signal_host_halt(&mut self);
}
