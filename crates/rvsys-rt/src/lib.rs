//! Trap handler runtime for bare-metal RV32 programs linked against newlib.
//!
//! The handler decodes `mcause`, `mepc` and the heap symbols as 32-bit
//! words, so it is only built for `riscv32` targets.
//!
//! This crate provides:
//! - `default_exception_handler_c`, the C-ABI entry the trap vector calls
//!   with a0..a7, returning the new a0
//! - [`BarePlatform`]: the logger, guest memory and CSRs of the real hart
//! - Optional trap vector (`trap-vector`, RV32 only)
//! - Optional panic handler
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! rvsys-rt = { path = "...", features = ["trap-vector", "panic-logger"] }
//! ```
//!
//! The linker script must define `_heap_start` and `_heap_end`; point
//! `mtvec` at `_trap_vector` (or at your own vector that calls
//! `default_exception_handler_c` and stores its result in a0).

#![no_std]

#[cfg(test)]
extern crate std;

#[cfg(target_arch = "riscv32")]
mod handler;
mod panic;
mod platform;
#[cfg(all(feature = "trap-vector", target_arch = "riscv32"))]
mod vector;

#[cfg(target_arch = "riscv32")]
pub use handler::default_exception_handler_c;
pub use platform::{BarePlatform, LOGGER_ADDR};
