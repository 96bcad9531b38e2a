//! Trap dispatch.
//!
//! Machine ECALLs are decoded into a [`SyscallRequest`] and routed to the
//! syscall handlers; the result lands in a0 and execution resumes after the
//! ECALL. Any other trap cause stops the dispatcher permanently.

use rvsys_isa::{ECALL_WIDTH, Syscall, SyscallRequest, TrapContext};

use crate::console::sys_write;
use crate::diag::{print_hex, print_str};
use crate::error::{SyscallError, SyscallResult, to_register};
use crate::halt::{HaltReason, sys_exit};
use crate::heap::HeapAllocator;
use crate::platform::Platform;
use crate::stat::sys_fstat;

/// Dispatcher options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Print `got exception!`, mcause, mepc and a7 on every trap.
    pub trap_banner: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    Dispatching,
    Halted(HaltReason),
}

/// What the trampoline should do after a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Write `a0` back and return to `resume_pc`.
    Resume { a0: u32, resume_pc: u32 },
    /// Never return to the program.
    Halted(HaltReason),
}

/// Result of routing one syscall request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    Return(SyscallResult),
    Exit(HaltReason),
}

/// Routes traps to syscall handlers. Owns the heap break.
#[derive(Debug)]
pub struct ExceptionDispatcher {
    heap: HeapAllocator,
    config: DispatchConfig,
    state: DispatchState,
}

impl ExceptionDispatcher {
    #[must_use]
    pub const fn new(heap: HeapAllocator, config: DispatchConfig) -> Self {
        Self {
            heap,
            config,
            state: DispatchState::Dispatching,
        }
    }

    #[must_use]
    pub const fn heap(&self) -> &HeapAllocator {
        &self.heap
    }

    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> DispatchState {
        self.state
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self.state, DispatchState::Halted(_))
    }

    /// Handle one trap.
    ///
    /// Once halted, every later trap reports the same halt reason without
    /// touching the platform.
    pub fn handle_trap<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        ctx: &TrapContext,
    ) -> TrapOutcome {
        if let DispatchState::Halted(reason) = self.state {
            return TrapOutcome::Halted(reason);
        }

        let request = ctx.request();
        if self.config.trap_banner {
            print_str(platform, "got exception!\n");
            print_hex(platform, ctx.mcause);
            print_str(platform, "\n");
            print_hex(platform, ctx.mepc);
            print_str(platform, "\n");
            print_hex(platform, request.number);
            print_str(platform, "\n");
        }

        let cause = ctx.cause();
        if !cause.is_machine_ecall() {
            print_str(platform, "unhandled cause\n");
            log_error!(mcause = ctx.mcause, mepc = ctx.mepc, "unhandled trap cause");
            return self.halt(HaltReason::UnhandledTrap {
                cause,
                mepc: ctx.mepc,
            });
        }

        match self.dispatch(platform, &request) {
            SyscallOutcome::Return(result) => {
                platform.advance_resume_address(ECALL_WIDTH);
                TrapOutcome::Resume {
                    a0: to_register(result),
                    resume_pc: ctx.mepc.wrapping_add(ECALL_WIDTH),
                }
            }
            SyscallOutcome::Exit(reason) => self.halt(reason),
        }
    }

    /// Route a decoded request to its handler.
    ///
    /// Unknown numbers produce `UnhandledSyscall`, which the guest sees as
    /// -1 in a0.
    pub fn dispatch<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        request: &SyscallRequest,
    ) -> SyscallOutcome {
        let Some(syscall) = Syscall::from_number(request.number) else {
            print_str(platform, "unhandled syscall!\n");
            log_warn!(number = request.number, "unhandled syscall");
            return SyscallOutcome::Return(Err(SyscallError::UnhandledSyscall(request.number)));
        };

        let result = match syscall {
            Syscall::Brk => {
                if self.config.trap_banner {
                    print_str(platform, "SYS_brk!\n");
                }
                self.heap.set_break(request.arg0)
            }
            Syscall::Fstat => sys_fstat(platform, request.arg0, request.arg1),
            Syscall::Write => sys_write(platform, request.arg0, request.arg1, request.arg2),
            Syscall::Exit => return SyscallOutcome::Exit(sys_exit(platform, request.arg0)),
        };
        log_debug!(syscall = syscall.name(), ?result, "syscall");
        SyscallOutcome::Return(result)
    }

    const fn halt(&mut self, reason: HaltReason) -> TrapOutcome {
        self.state = DispatchState::Halted(reason);
        TrapOutcome::Halted(reason)
    }
}

#[cfg(test)]
mod tests {
    use rvsys_isa::{Exception, TrapCause, syscall_nr};

    use super::*;
    use crate::test_utils::{MEM_BASE, MockPlatform};

    const PC: u32 = 0x0100;

    fn dispatcher() -> ExceptionDispatcher {
        let heap = HeapAllocator::new(0x1000, 0x2000).unwrap();
        ExceptionDispatcher::new(heap, DispatchConfig::default())
    }

    fn ecall(num: u32, a0: u32, a1: u32, a2: u32) -> TrapContext {
        TrapContext::ecall(PC, num, a0, a1, a2)
    }

    #[test]
    fn test_brk_resumes_after_ecall() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let ctx = ecall(syscall_nr::SYS_BRK, 0x1500, 0, 0);
        let outcome = dispatcher.handle_trap(&mut platform, &ctx);

        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: 0x1500,
                resume_pc: PC + 4
            }
        );
        assert_eq!(platform.resume_advances, [4]);
        assert_eq!(dispatcher.heap().current_break(), 0x1500);
        assert_eq!(dispatcher.state(), DispatchState::Dispatching);
    }

    #[test]
    fn test_brk_failure_is_minus_one() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let ctx = ecall(syscall_nr::SYS_BRK, 0x500, 0, 0);
        let outcome = dispatcher.handle_trap(&mut platform, &ctx);
        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: u32::MAX,
                resume_pc: PC + 4
            }
        );
        assert_eq!(dispatcher.heap().current_break(), 0x1000);
    }

    #[test]
    fn test_write_routes_three_args() {
        let mut platform = MockPlatform::new();
        platform.poke(MEM_BASE, b"hi");
        let mut dispatcher = dispatcher();

        let outcome =
            dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_WRITE, 1, MEM_BASE, 2));

        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: 0,
                resume_pc: PC + 4
            }
        );
        assert_eq!(platform.logger_str(), "hi");
    }

    #[test]
    fn test_write_bad_fd_resumes() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let outcome =
            dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_WRITE, 2, MEM_BASE, 2));

        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: u32::MAX,
                resume_pc: PC + 4
            }
        );
        assert!(platform.logger.is_empty());
    }

    #[test]
    fn test_fstat_routes_two_args() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let outcome =
            dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_FSTAT, 1, MEM_BASE, 0));

        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: 0,
                resume_pc: PC + 4
            }
        );
        assert_eq!(platform.peek(MEM_BASE + 16, 4), 0o020_000u32.to_le_bytes());
    }

    #[test]
    fn test_unknown_syscall_returns_minus_one() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let outcome = dispatcher.handle_trap(&mut platform, &ecall(63, 0, MEM_BASE, 4));

        assert_eq!(
            outcome,
            TrapOutcome::Resume {
                a0: u32::MAX,
                resume_pc: PC + 4
            }
        );
        assert_eq!(platform.logger_str(), "unhandled syscall!\n");
        assert!(!dispatcher.is_halted());
    }

    #[test]
    fn test_exit_halts_without_advancing() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();

        let outcome = dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_EXIT, 7, 0, 0));

        let reason = HaltReason::Exit { status: 7 };
        assert_eq!(outcome, TrapOutcome::Halted(reason));
        assert_eq!(dispatcher.state(), DispatchState::Halted(reason));
        assert!(platform.resume_advances.is_empty());
        assert_eq!(platform.halt_signals, 1);
    }

    #[test]
    fn test_unhandled_cause_halts_without_syscall() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();
        // Illegal instruction with a7 set to brk: the handler must not run.
        let ctx = TrapContext::new(2, PC, [0x1800, 0, 0, 0, 0, 0, 0, syscall_nr::SYS_BRK]);

        let outcome = dispatcher.handle_trap(&mut platform, &ctx);

        assert_eq!(
            outcome,
            TrapOutcome::Halted(HaltReason::UnhandledTrap {
                cause: TrapCause::Exception(Exception::IllegalInstruction),
                mepc: PC
            })
        );
        assert_eq!(dispatcher.heap().current_break(), 0x1000);
        assert!(platform.resume_advances.is_empty());
        assert_eq!(platform.halt_signals, 0);
        assert_eq!(platform.logger_str(), "unhandled cause\n");
    }

    #[test]
    fn test_user_ecall_is_fatal() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();
        let mut ctx = ecall(syscall_nr::SYS_BRK, 0x1800, 0, 0);
        ctx.mcause = 8;

        assert!(matches!(
            dispatcher.handle_trap(&mut platform, &ctx),
            TrapOutcome::Halted(HaltReason::UnhandledTrap { .. })
        ));
    }

    #[test]
    fn test_halted_is_terminal() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();
        dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_EXIT, 0, 0, 0));

        let ctx = ecall(syscall_nr::SYS_BRK, 0x1800, 0, 0);
        let outcome = dispatcher.handle_trap(&mut platform, &ctx);

        assert_eq!(outcome, TrapOutcome::Halted(HaltReason::Exit { status: 0 }));
        assert_eq!(dispatcher.heap().current_break(), 0x1000);
        assert!(platform.resume_advances.is_empty());
        assert_eq!(platform.halt_signals, 1);
    }

    #[test]
    fn test_trap_banner() {
        let mut platform = MockPlatform::new();
        let heap = HeapAllocator::new(0x1000, 0x2000).unwrap();
        let mut dispatcher = ExceptionDispatcher::new(heap, DispatchConfig { trap_banner: true });

        dispatcher.handle_trap(&mut platform, &ecall(syscall_nr::SYS_BRK, 0, 0, 0));

        assert_eq!(
            platform.logger_str(),
            "got exception!\n0x0000000b\n0x00000100\n0x000000d6\nSYS_brk!\n"
        );
    }

    #[test]
    fn test_resume_pc_wraps() {
        let mut platform = MockPlatform::new();
        let mut dispatcher = dispatcher();
        let ctx = TrapContext::ecall(u32::MAX - 1, syscall_nr::SYS_BRK, 0, 0, 0);

        assert_eq!(
            dispatcher.handle_trap(&mut platform, &ctx),
            TrapOutcome::Resume {
                a0: 0x1000,
                resume_pc: 2
            }
        );
    }
}
