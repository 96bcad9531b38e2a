//! Syscall numbers understood by the trap handler.

use core::fmt;

/// Syscall numbers from newlib's RISC-V `machine/syscall.h`.
///
/// These match the Linux RISC-V ABI.
pub mod syscall_nr {
    pub const SYS_WRITE: u32 = 64;
    pub const SYS_FSTAT: u32 = 80;
    pub const SYS_EXIT: u32 = 93;
    pub const SYS_BRK: u32 = 214;
}

/// Syscalls with a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Syscall {
    Write,
    Fstat,
    Exit,
    Brk,
}

impl Syscall {
    /// Every handled syscall, ordered by number.
    pub const ALL: [Self; 4] = [Self::Write, Self::Fstat, Self::Exit, Self::Brk];

    #[must_use]
    pub const fn from_number(num: u32) -> Option<Self> {
        use syscall_nr::{SYS_BRK, SYS_EXIT, SYS_FSTAT, SYS_WRITE};
        match num {
            SYS_WRITE => Some(Self::Write),
            SYS_FSTAT => Some(Self::Fstat),
            SYS_EXIT => Some(Self::Exit),
            SYS_BRK => Some(Self::Brk),
            _ => None,
        }
    }

    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Write => syscall_nr::SYS_WRITE,
            Self::Fstat => syscall_nr::SYS_FSTAT,
            Self::Exit => syscall_nr::SYS_EXIT,
            Self::Brk => syscall_nr::SYS_BRK,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Fstat => "fstat",
            Self::Exit => "exit",
            Self::Brk => "brk",
        }
    }

    /// Look up a syscall by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sys| sys.name() == name)
    }

    /// Number of argument registers the handler reads.
    #[must_use]
    pub const fn arg_count(self) -> u8 {
        match self {
            Self::Write => 3,
            Self::Fstat => 2,
            Self::Exit | Self::Brk => 1,
        }
    }
}

impl fmt::Display for Syscall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_lookup() {
        for sys in Syscall::ALL {
            assert_eq!(Syscall::from_number(sys.number()), Some(sys));
        }
        assert_eq!(Syscall::from_number(63), None);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(Syscall::from_name("brk"), Some(Syscall::Brk));
        assert_eq!(Syscall::from_name("fstat"), Some(Syscall::Fstat));
        assert_eq!(Syscall::from_name("read"), None);
    }
}
