//! Program termination.

use rvsys_isa::TrapCause;

use crate::platform::Platform;

/// Why the dispatcher stopped for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// The guest called `exit`.
    Exit { status: i32 },
    /// A trap other than a machine ECALL.
    UnhandledTrap { cause: TrapCause, mepc: u32 },
}

impl HaltReason {
    /// Process exit code as seen by a host: the exit status, or 1 for a
    /// fatal trap.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { status } => *status,
            Self::UnhandledTrap { .. } => 1,
        }
    }
}

/// Signal the host that the program is done.
///
/// The status is only observed by the host. On target the caller spins
/// after this returns; nothing runs again until the simulator resets.
pub fn sys_exit<P: Platform + ?Sized>(platform: &mut P, status: u32) -> HaltReason {
    #[allow(clippy::cast_possible_wrap)]
    let status = status as i32;
    log_debug!(status, "exit");
    platform.signal_host_halt();
    HaltReason::Exit { status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockPlatform;

    #[test]
    fn test_exit_signals_host() {
        let mut platform = MockPlatform::new();
        let reason = sys_exit(&mut platform, u32::MAX);

        assert_eq!(reason, HaltReason::Exit { status: -1 });
        assert_eq!(reason.exit_code(), -1);
        assert_eq!(platform.halt_signals, 1);
        assert!(platform.resume_advances.is_empty());
    }
}
