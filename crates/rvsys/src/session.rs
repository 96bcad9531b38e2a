//! Emulator session: one dispatcher, one guest, one run.

use rvsys_ecall::{DispatchState, ExceptionDispatcher, HaltReason, HeapAllocator, TrapOutcome};
use rvsys_isa::TrapContext;
use tracing::{debug, info, warn};

use crate::config::EmulatorConfig;
use crate::error::{Error, Result};
use crate::memory::FlatMemory;
use crate::platform::HostPlatform;
use crate::script::{Command, Script};

/// Summary of a script run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Halt reason, or `None` if the script ended with the guest still running.
    pub halt: Option<HaltReason>,
    /// Number of traps delivered to the dispatcher.
    pub traps: usize,
    /// Bytes the guest stored to the logger.
    pub console: Vec<u8>,
    /// Heap break at the end of the run.
    pub final_break: u32,
}

impl RunReport {
    /// Guest exit code, if the guest halted.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.halt.as_ref().map(HaltReason::exit_code)
    }

    pub fn print_json(&self) {
        let halt = match self.halt {
            Some(HaltReason::Exit { status }) => format!(r#"{{"kind":"exit","status":{status}}}"#),
            Some(HaltReason::UnhandledTrap { cause, mepc }) => format!(
                r#"{{"kind":"unhandled_trap","mcause":{},"mepc":{mepc}}}"#,
                cause.to_mcause()
            ),
            None => "null".to_string(),
        };
        println!(
            r#"{{"halt":{halt},"traps":{},"console_bytes":{},"final_break":{}}}"#,
            self.traps,
            self.console.len(),
            self.final_break
        );
    }
}

/// Host-side stand-in for a guest program taking traps.
///
/// Tracks the guest pc: it starts at the memory base and follows the resume
/// address of every handled ECALL.
pub struct Emulator {
    dispatcher: ExceptionDispatcher,
    platform: HostPlatform,
    pc: u32,
    traps: usize,
    last_a0: Option<u32>,
}

impl Emulator {
    /// Build an emulator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or guest memory
    /// cannot be allocated.
    pub fn new(config: &EmulatorConfig) -> Result<Self> {
        config.validate()?;
        let memory = FlatMemory::new(config.memory_base, config.memory_size)?;
        let heap = HeapAllocator::new(config.heap_start, config.heap_end)?;
        debug!(
            heap_start = config.heap_start,
            heap_end = config.heap_end,
            "emulator ready"
        );
        Ok(Self {
            dispatcher: ExceptionDispatcher::new(heap, config.dispatch_config()),
            platform: HostPlatform::new(memory),
            pc: config.memory_base,
            traps: 0,
            last_a0: None,
        })
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &ExceptionDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub const fn platform(&self) -> &HostPlatform {
        &self.platform
    }

    pub const fn platform_mut(&mut self) -> &mut HostPlatform {
        &mut self.platform
    }

    /// Current guest pc.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Deliver one trap.
    pub fn trap(&mut self, ctx: &TrapContext) -> TrapOutcome {
        self.traps += 1;
        let outcome = self.dispatcher.handle_trap(&mut self.platform, ctx);
        match outcome {
            TrapOutcome::Resume { a0, resume_pc } => {
                self.pc = resume_pc;
                self.last_a0 = Some(a0);
            }
            TrapOutcome::Halted(_) => self.last_a0 = None,
        }
        outcome
    }

    /// Run every command of `script`.
    ///
    /// Commands after the guest halts are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error on a failed `expect`, or a `poke` outside guest
    /// memory.
    pub fn run(&mut self, script: &Script) -> Result<RunReport> {
        for (line, command) in &script.commands {
            if let DispatchState::Halted(reason) = self.dispatcher.state() {
                warn!(line, ?reason, "guest halted, skipping remaining commands");
                break;
            }
            self.execute(*line, command)?;
        }

        let halt = match self.dispatcher.state() {
            DispatchState::Halted(reason) => Some(reason),
            DispatchState::Dispatching => None,
        };
        info!(traps = self.traps, ?halt, "run finished");
        Ok(RunReport {
            halt,
            traps: self.traps,
            console: self.platform.take_console(),
            final_break: self.dispatcher.heap().current_break(),
        })
    }

    fn execute(&mut self, line: usize, command: &Command) -> Result<()> {
        match command {
            Command::Poke { addr, bytes } => {
                self.platform.memory_mut().write(*addr, bytes)?;
            }
            Command::ExpectA0(expected) => {
                let actual = self.last_a0.ok_or(Error::NothingToExpect { line })?;
                if actual != *expected {
                    return Err(Error::ExpectationFailed {
                        line,
                        expected: *expected,
                        actual,
                    });
                }
            }
            Command::Ecall { .. } | Command::Trap { .. } => {
                if let Some(ctx) = command.trap_context(self.pc) {
                    let outcome = self.trap(&ctx);
                    debug!(line, ?outcome, "trap");
                }
            }
        }
        Ok(())
    }
}
