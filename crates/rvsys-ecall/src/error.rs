use thiserror::Error;

/// Errno values reported alongside a failed syscall.
pub mod errno {
    pub const ENOMEM: i32 = 12;
    pub const EFAULT: i32 = 14;
    pub const ENOSYS: i32 = 38;
}

/// Value written to a0 for a failed syscall (-1).
pub const FAILURE: u32 = u32::MAX;

/// Recoverable syscall failures. The guest sees -1 in a0 and resumes.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SyscallError {
    #[error("write to unsupported file descriptor {0}")]
    InvalidDescriptor(u32),
    #[error("fstat not supported for file descriptor {0}")]
    NotSupported(u32),
    #[error("break {requested:#x} is below heap start {heap_start:#x}")]
    OutOfRange { requested: u32, heap_start: u32 },
    #[error("heap is disabled")]
    HeapDisabled,
    #[error("guest range {addr:#x}+{len:#x} is not accessible")]
    BadAddress { addr: u32, len: u32 },
    #[error("unhandled syscall {0}")]
    UnhandledSyscall(u32),
}

impl SyscallError {
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::InvalidDescriptor(_) | Self::NotSupported(_) | Self::UnhandledSyscall(_) => {
                errno::ENOSYS
            }
            Self::OutOfRange { .. } | Self::HeapDisabled => errno::ENOMEM,
            Self::BadAddress { .. } => errno::EFAULT,
        }
    }
}

/// Success payload or failure of one syscall.
pub type SyscallResult = Result<u32, SyscallError>;

/// Value reflected into a0 for a syscall result.
#[must_use]
pub const fn to_register(result: SyscallResult) -> u32 {
    match result {
        Ok(value) => value,
        Err(_) => FAILURE,
    }
}

/// Heap construction errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    #[error("heap start {start:#x} is above heap end {end:#x}")]
    InvertedBounds { start: u32, end: u32 },
}
