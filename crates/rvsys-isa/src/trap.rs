//! Machine trap cause decoding (`mcause`).

use core::fmt;

/// Interrupt flag in `mcause` on RV32.
///
/// RV64 keeps the flag in bit 63, so RV64 `mcause` values must not be
/// truncated into a `u32` and decoded here.
pub const MCAUSE_INTERRUPT: u32 = 1 << 31;

/// Synchronous exception codes from the privileged spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exception {
    InstructionMisaligned,
    InstructionAccessFault,
    IllegalInstruction,
    Breakpoint,
    LoadMisaligned,
    LoadAccessFault,
    StoreMisaligned,
    StoreAccessFault,
    UserEcall,
    SupervisorEcall,
    MachineEcall,
    InstructionPageFault,
    LoadPageFault,
    StorePageFault,
    /// Reserved or custom code.
    Other(u32),
}

impl Exception {
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::InstructionMisaligned,
            1 => Self::InstructionAccessFault,
            2 => Self::IllegalInstruction,
            3 => Self::Breakpoint,
            4 => Self::LoadMisaligned,
            5 => Self::LoadAccessFault,
            6 => Self::StoreMisaligned,
            7 => Self::StoreAccessFault,
            8 => Self::UserEcall,
            9 => Self::SupervisorEcall,
            11 => Self::MachineEcall,
            12 => Self::InstructionPageFault,
            13 => Self::LoadPageFault,
            15 => Self::StorePageFault,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InstructionMisaligned => 0,
            Self::InstructionAccessFault => 1,
            Self::IllegalInstruction => 2,
            Self::Breakpoint => 3,
            Self::LoadMisaligned => 4,
            Self::LoadAccessFault => 5,
            Self::StoreMisaligned => 6,
            Self::StoreAccessFault => 7,
            Self::UserEcall => 8,
            Self::SupervisorEcall => 9,
            Self::MachineEcall => 11,
            Self::InstructionPageFault => 12,
            Self::LoadPageFault => 13,
            Self::StorePageFault => 15,
            Self::Other(code) => code,
        }
    }
}

/// Decoded `mcause` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrapCause {
    Exception(Exception),
    Interrupt(u32),
}

impl TrapCause {
    /// Decode a raw `mcause` register value.
    #[must_use]
    pub const fn from_mcause(mcause: u32) -> Self {
        let code = mcause & !MCAUSE_INTERRUPT;
        if mcause & MCAUSE_INTERRUPT != 0 {
            Self::Interrupt(code)
        } else {
            Self::Exception(Exception::from_code(code))
        }
    }

    /// Encode back to the raw `mcause` value.
    #[must_use]
    pub const fn to_mcause(self) -> u32 {
        match self {
            Self::Exception(exc) => exc.code(),
            Self::Interrupt(code) => code | MCAUSE_INTERRUPT,
        }
    }

    /// True only for an ECALL raised from machine mode.
    ///
    /// The handler runs bare-metal with everything in M-mode, so user and
    /// supervisor ECALLs are treated like any other unexpected cause.
    #[must_use]
    pub const fn is_machine_ecall(self) -> bool {
        matches!(self, Self::Exception(Exception::MachineEcall))
    }
}

impl fmt::Display for TrapCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exception(Exception::Other(code)) => write!(f, "exception {code}"),
            Self::Exception(exc) => write!(f, "{exc:?}"),
            Self::Interrupt(code) => write!(f, "interrupt {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_ecall() {
        let cause = TrapCause::from_mcause(0xb);
        assert_eq!(cause, TrapCause::Exception(Exception::MachineEcall));
        assert!(cause.is_machine_ecall());
    }

    #[test]
    fn test_lower_privilege_ecall_is_not_handled() {
        assert!(!TrapCause::from_mcause(8).is_machine_ecall());
        assert!(!TrapCause::from_mcause(9).is_machine_ecall());
    }

    #[test]
    fn test_interrupt_with_ecall_code() {
        // Machine external interrupt shares code 11 with M-mode ECALL.
        let cause = TrapCause::from_mcause(MCAUSE_INTERRUPT | 11);
        assert_eq!(cause, TrapCause::Interrupt(11));
        assert!(!cause.is_machine_ecall());
    }

    #[test]
    fn test_interrupt_flag_is_rv32_bit() {
        assert_eq!(MCAUSE_INTERRUPT, 0x8000_0000);
        let external = TrapCause::from_mcause(0x8000_000b);
        assert_eq!(external, TrapCause::Interrupt(11));
        // An RV64 machine external interrupt (bit 63 | 11) cut down to 32
        // bits is indistinguishable from an ECALL: decoding is RV32-only.
        #[allow(clippy::cast_possible_truncation)]
        let truncated = 0x8000_0000_0000_000b_u64 as u32;
        assert!(TrapCause::from_mcause(truncated).is_machine_ecall());
    }

    #[test]
    fn test_reserved_code_roundtrip() {
        let cause = TrapCause::from_mcause(10);
        assert_eq!(cause, TrapCause::Exception(Exception::Other(10)));
        assert_eq!(cause.to_mcause(), 10);
        assert_eq!(TrapCause::Interrupt(7).to_mcause(), 0x8000_0007);
    }
}
