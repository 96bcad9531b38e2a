//! File status (`fstat`).

use crate::console::{STDOUT_FD, bad_address};
use crate::error::{SyscallError, SyscallResult};
use crate::platform::{AccessFault, Platform};

/// Character device file type bit.
pub const S_IFCHR: u32 = 0o020_000;

/// Layout of libgloss' RV32 `struct kernel_stat`, the buffer the fstat
/// syscall fills in.
pub mod kernel_stat {
    pub const ST_MODE_OFFSET: u32 = 16;
    pub const ST_BLKSIZE_OFFSET: u32 = 56;
    pub const SIZE: u32 = 128;
}

/// The stat fields this runtime reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStatus {
    pub mode: u32,
    pub blksize: i32,
}

impl FileStatus {
    /// Stdout: an unbuffered character device.
    pub const CONSOLE: Self = Self {
        mode: S_IFCHR,
        blksize: 0,
    };

    /// Write `st_mode` and `st_blksize` into the guest buffer at `out`.
    /// Other fields keep whatever the caller put there.
    ///
    /// # Errors
    ///
    /// Returns the fault if the buffer is not in guest memory; nothing is
    /// written in that case.
    pub fn store<P: Platform + ?Sized>(
        &self,
        platform: &mut P,
        out: u32,
    ) -> Result<(), AccessFault> {
        platform.check_guest_range(out, kernel_stat::ST_BLKSIZE_OFFSET + 4)?;
        platform.store_guest(out + kernel_stat::ST_MODE_OFFSET, &self.mode.to_le_bytes())?;
        platform.store_guest(
            out + kernel_stat::ST_BLKSIZE_OFFSET,
            &self.blksize.to_le_bytes(),
        )
    }
}

/// Report stdout as a character device.
///
/// # Errors
///
/// `NotSupported` (ENOSYS) for any other descriptor, `BadAddress` if `out`
/// is not in guest memory.
pub fn sys_fstat<P: Platform + ?Sized>(platform: &mut P, fd: u32, out: u32) -> SyscallResult {
    if fd != STDOUT_FD {
        log_warn!(fd, "fstat on unsupported descriptor");
        return Err(SyscallError::NotSupported(fd));
    }
    let status = FileStatus::CONSOLE;
    status.store(platform, out).map_err(bad_address)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MEM_BASE, MEM_SIZE, MockPlatform};

    const OUT: u32 = MEM_BASE + 0x100;

    fn read_u32(platform: &MockPlatform, addr: u32) -> u32 {
        let bytes = platform.peek(addr, 4);
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[test]
    fn test_fstat_stdout() {
        let mut platform = MockPlatform::new();
        platform.poke(OUT, &[0xaa; kernel_stat::SIZE as usize]);

        assert_eq!(sys_fstat(&mut platform, 1, OUT), Ok(0));
        assert_eq!(
            read_u32(&platform, OUT + kernel_stat::ST_MODE_OFFSET),
            S_IFCHR
        );
        assert_eq!(read_u32(&platform, OUT + kernel_stat::ST_BLKSIZE_OFFSET), 0);
        // st_nlink sits right after st_mode and is left alone.
        assert_eq!(read_u32(&platform, OUT + 20), 0xaaaa_aaaa);
    }

    #[test]
    fn test_fstat_other_descriptor_leaves_buffer() {
        let mut platform = MockPlatform::new();
        platform.poke(OUT, &[0x55; kernel_stat::SIZE as usize]);

        assert_eq!(
            sys_fstat(&mut platform, 0, OUT),
            Err(SyscallError::NotSupported(0))
        );
        let buf = platform.peek(OUT, kernel_stat::SIZE as usize);
        assert!(buf.iter().all(|&b| b == 0x55));
    }

    #[test]
    fn test_fstat_bad_buffer() {
        let mut platform = MockPlatform::new();
        let out = MEM_BASE + MEM_SIZE - 20;

        assert_eq!(
            sys_fstat(&mut platform, 1, out),
            Err(SyscallError::BadAddress { addr: out, len: 60 })
        );
        assert!(platform.peek(out, 20).iter().all(|&b| b == 0));
    }
}
