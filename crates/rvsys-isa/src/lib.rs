//! RISC-V trap and syscall definitions shared by the guest runtime and the
//! host emulator.
//!
//! This crate is `no_std` and dependency-free: it only knows how to name
//! trap causes, syscall numbers and the register state a trap trampoline
//! hands over. Register and CSR values are RV32 words.

#![no_std]

mod context;
mod syscalls;
mod trap;

pub use context::{ECALL_WIDTH, NUM_ARG_REGS, REG_A0, REG_A7, SyscallRequest, TrapContext};
pub use syscalls::{Syscall, syscall_nr};
pub use trap::{Exception, MCAUSE_INTERRUPT, TrapCause};
