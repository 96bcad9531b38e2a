//! Flat guest memory.
//!
//! One contiguous byte region at a fixed guest base address. Anything
//! outside it is unmapped.

use thiserror::Error;

/// Guest memory error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("invalid memory size: {0:#x}")]
    InvalidSize(u64),

    #[error("region {base:#x}+{size:#x} does not fit the 32-bit address space")]
    OutOfAddressSpace { base: u32, size: u64 },

    #[error("access {addr:#x}+{len:#x} is outside guest memory")]
    OutOfBounds { addr: u32, len: u64 },
}

/// Guest memory backed by a vector.
pub struct FlatMemory {
    base: u32,
    bytes: Vec<u8>,
}

impl FlatMemory {
    /// Allocate zeroed memory of `size` bytes at guest address `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or the region would extend past
    /// the end of the 32-bit address space.
    pub fn new(base: u32, size: u64) -> Result<Self, MemoryError> {
        if size == 0 {
            return Err(MemoryError::InvalidSize(size));
        }
        if u64::from(base) + size > 1 << 32 {
            return Err(MemoryError::OutOfAddressSpace { base, size });
        }
        let len = usize::try_from(size).map_err(|_| MemoryError::InvalidSize(size))?;
        Ok(Self {
            base,
            bytes: vec![0; len],
        })
    }

    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Exclusive end address (may be `1 << 32`).
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.base) + self.size()
    }

    #[must_use]
    pub fn contains(&self, addr: u32, len: u64) -> bool {
        addr >= self.base && u64::from(addr) + len <= self.end()
    }

    fn offset(&self, addr: u32, len: u64) -> Result<usize, MemoryError> {
        if !self.contains(addr, len) {
            return Err(MemoryError::OutOfBounds { addr, len });
        }
        Ok((addr - self.base) as usize)
    }

    /// Borrow `len` bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is not fully inside guest memory.
    pub fn read(&self, addr: u32, len: usize) -> Result<&[u8], MemoryError> {
        let off = self.offset(addr, len as u64)?;
        Ok(&self.bytes[off..off + len])
    }

    /// Copy `data` into guest memory at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is not fully inside guest memory;
    /// nothing is written in that case.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        let off = self.offset(addr, data.len() as u64)?;
        self.bytes[off..off + data.len()].copy_from_slice(data);
        Ok(())
    }
}
