//! RVSYS - host-side emulator for the bare-metal ECALL handler.
//!
//! Replays trap scripts against the same [`ExceptionDispatcher`] the guest
//! runtime links, with guest memory and the logger peripheral modelled on
//! the host.
//!
//! # Example
//!
//! ```ignore
//! use rvsys::{Emulator, EmulatorConfig, Script};
//!
//! let script = Script::parse("ecall brk 0x9000\nexpect a0 0x9000\necall exit 0\n")?;
//! let mut emulator = Emulator::new(&EmulatorConfig::default())?;
//! let report = emulator.run(&script)?;
//! assert_eq!(report.exit_code(), Some(0));
//! ```

mod config;
mod error;
mod memory;
mod platform;
mod script;
mod session;

pub use config::{EmulatorConfig, parse_u32};
pub use error::{Error, Result};
pub use memory::{FlatMemory, MemoryError};
pub use platform::HostPlatform;
pub use script::{Command, Script, ScriptError, SyscallSpec};
pub use session::{Emulator, RunReport};

pub use rvsys_ecall::{
    DispatchConfig, DispatchState, ExceptionDispatcher, HaltReason, HeapAllocator, SyscallError,
    TrapOutcome,
};
pub use rvsys_isa::{Syscall, SyscallRequest, TrapCause, TrapContext};
