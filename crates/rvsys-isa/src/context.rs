//! Trap-time register state.

use crate::trap::TrapCause;

/// First argument / return register.
pub const REG_A0: u8 = 10;
/// Syscall number register.
pub const REG_A7: u8 = 17;

/// Number of argument registers (a0..a7) saved by the trampoline.
pub const NUM_ARG_REGS: usize = 8;

/// Width of the ECALL instruction. ECALL has no compressed form.
pub const ECALL_WIDTH: u32 = 4;

/// Register state delivered by the trap trampoline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrapContext {
    pub mcause: u32,
    pub mepc: u32,
    /// a0..a7 in order.
    pub args: [u32; NUM_ARG_REGS],
}

impl TrapContext {
    #[must_use]
    pub const fn new(mcause: u32, mepc: u32, args: [u32; NUM_ARG_REGS]) -> Self {
        Self { mcause, mepc, args }
    }

    /// Context for a machine-mode ECALL with syscall number `num` in a7.
    #[must_use]
    pub const fn ecall(mepc: u32, num: u32, a0: u32, a1: u32, a2: u32) -> Self {
        Self {
            mcause: 11,
            mepc,
            args: [a0, a1, a2, 0, 0, 0, 0, num],
        }
    }

    #[must_use]
    pub const fn cause(&self) -> TrapCause {
        TrapCause::from_mcause(self.mcause)
    }

    #[must_use]
    pub const fn request(&self) -> SyscallRequest {
        SyscallRequest::from_context(self)
    }
}

/// Syscall number and arguments decoded from a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyscallRequest {
    /// Syscall number (a7).
    pub number: u32,
    /// a0
    pub arg0: u32,
    /// a1
    pub arg1: u32,
    /// a2
    pub arg2: u32,
}

impl SyscallRequest {
    #[must_use]
    pub const fn new(number: u32, arg0: u32, arg1: u32, arg2: u32) -> Self {
        Self {
            number,
            arg0,
            arg1,
            arg2,
        }
    }

    #[must_use]
    pub const fn from_context(ctx: &TrapContext) -> Self {
        Self {
            number: ctx.args[(REG_A7 - REG_A0) as usize],
            arg0: ctx.args[0],
            arg1: ctx.args[1],
            arg2: ctx.args[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_context() {
        let ctx = TrapContext::new(11, 0x100, [1, 2, 3, 4, 5, 6, 7, 214]);
        let req = ctx.request();
        assert_eq!(req, SyscallRequest::new(214, 1, 2, 3));
    }

    #[test]
    fn test_ecall_context() {
        let ctx = TrapContext::ecall(0x200, 64, 1, 0x3000, 5);
        assert_eq!(ctx.args[usize::from(REG_A7 - REG_A0)], 64);
        assert_eq!(ctx.request(), SyscallRequest::new(64, 1, 0x3000, 5));
        assert!(ctx.cause().is_machine_ecall());
    }
}
