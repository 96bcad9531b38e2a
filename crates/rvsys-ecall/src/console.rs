//! Console output (`write`).

use crate::error::{SyscallError, SyscallResult};
use crate::platform::{AccessFault, Platform};

/// The only descriptor the console accepts.
pub const STDOUT_FD: u32 = 1;

/// Copy `len` bytes at `buf` to the logger, one byte at a time.
///
/// The whole range is checked before the first byte goes out, so a write
/// either emits everything or nothing. Returns 0 rather than a byte count,
/// which is what the runtime's `_write` wrapper expects.
///
/// # Errors
///
/// `InvalidDescriptor` for any fd other than stdout, `BadAddress` if the
/// buffer is not in guest memory.
pub fn sys_write<P: Platform + ?Sized>(
    platform: &mut P,
    fd: u32,
    buf: u32,
    len: u32,
) -> SyscallResult {
    if fd != STDOUT_FD {
        log_warn!(fd, "write to unsupported descriptor");
        return Err(SyscallError::InvalidDescriptor(fd));
    }
    platform.check_guest_range(buf, len).map_err(bad_address)?;
    for i in 0..len {
        let byte = platform.load_guest_u8(buf + i).map_err(bad_address)?;
        platform.logger_write(byte);
    }
    log_debug!(buf, len, "console write");
    Ok(0)
}

pub(crate) const fn bad_address(fault: AccessFault) -> SyscallError {
    SyscallError::BadAddress {
        addr: fault.addr,
        len: fault.len,
    }
}
