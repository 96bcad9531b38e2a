//! ECALL dispatch for bare-metal RISC-V programs.
//!
//! Services the handful of syscalls a minimal newlib runtime issues:
//! `brk` (bump heap), `fstat` and `write` on stdout, and `exit`. Everything
//! that touches hardware goes through the [`Platform`] trait so the same
//! dispatcher runs inside the guest and inside the host emulator.
//!
//! ```ignore
//! use rvsys_ecall::{DispatchConfig, ExceptionDispatcher, HeapAllocator, TrapOutcome};
//!
//! let heap = HeapAllocator::new(0x1000, 0x2000)?;
//! let mut dispatcher = ExceptionDispatcher::new(heap, DispatchConfig::default());
//! match dispatcher.handle_trap(&mut platform, &ctx) {
//!     TrapOutcome::Resume { a0, .. } => { /* write a0 back */ }
//!     TrapOutcome::Halted(reason) => { /* spin */ }
//! }
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

macro_rules! log_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        tracing::debug!($($arg)*);
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        tracing::warn!($($arg)*);
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        tracing::error!($($arg)*);
    };
}

mod console;
mod diag;
mod dispatcher;
mod error;
mod halt;
mod heap;
mod platform;
mod stat;

#[cfg(test)]
mod test_utils;

pub use console::{STDOUT_FD, sys_write};
pub use diag::{LoggerWriter, print_hex, print_str};
pub use dispatcher::{
    DispatchConfig, DispatchState, ExceptionDispatcher, SyscallOutcome, TrapOutcome,
};
pub use error::{FAILURE, HeapError, SyscallError, SyscallResult, errno, to_register};
pub use halt::{HaltReason, sys_exit};
pub use heap::HeapAllocator;
pub use platform::{AccessFault, Platform};
pub use stat::{FileStatus, S_IFCHR, kernel_stat, sys_fstat};
