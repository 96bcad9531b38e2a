//! Bump-pointer heap break (`brk`).
//!
//! The heap is the fixed window `[start, end]` laid out by the linker.
//! Nothing is ever freed; the guest's `sbrk` only moves the break.

use crate::error::{HeapError, SyscallError, SyscallResult};

/// Heap window plus the current break.
///
/// Invariant: `start <= brk <= end`. A window with `start == end` means
/// the program was linked without a heap and every request fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapAllocator {
    start: u32,
    end: u32,
    brk: u32,
}

impl HeapAllocator {
    /// Create a heap over `[start, end]` with the break at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start > end`.
    pub const fn new(start: u32, end: u32) -> Result<Self, HeapError> {
        if start > end {
            return Err(HeapError::InvertedBounds { start, end });
        }
        Ok(Self {
            start,
            end,
            brk: start,
        })
    }

    /// Heap with no space at all.
    #[must_use]
    pub const fn disabled(at: u32) -> Self {
        Self {
            start: at,
            end: at,
            brk: at,
        }
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    #[must_use]
    pub const fn current_break(&self) -> u32 {
        self.brk
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.start == self.end
    }

    /// Bytes left between the break and the end of the heap.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.end - self.brk
    }

    /// Move the break.
    ///
    /// `0` queries the current break. Requests past the end are clamped to
    /// the end. On success the new break is returned (not 0): newlib's
    /// `sbrk` compares it against the requested address.
    ///
    /// # Errors
    ///
    /// Fails without touching the break if the heap is disabled or the
    /// request lies below the heap start.
    pub fn set_break(&mut self, requested: u32) -> SyscallResult {
        if self.is_disabled() {
            log_warn!(requested, "brk on disabled heap");
            return Err(SyscallError::HeapDisabled);
        }
        if requested == 0 {
            return Ok(self.brk);
        }
        if requested < self.start {
            log_warn!(requested, heap_start = self.start, "brk below heap start");
            return Err(SyscallError::OutOfRange {
                requested,
                heap_start: self.start,
            });
        }
        if requested > self.end {
            log_debug!(requested, heap_end = self.end, "brk clamped to heap end");
        }
        self.brk = requested.min(self.end);
        Ok(self.brk)
    }
}
