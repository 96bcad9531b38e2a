//! Diagnostic output on the memory-mapped logger.

use core::fmt;

use crate::platform::Platform;

/// Print a string to the logger.
pub fn print_str<P: Platform + ?Sized>(platform: &mut P, s: &str) {
    for &b in s.as_bytes() {
        platform.logger_write(b);
    }
}

/// Print a word as `0x` followed by eight lowercase hex digits.
pub fn print_hex<P: Platform + ?Sized>(platform: &mut P, value: u32) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    platform.logger_write(b'0');
    platform.logger_write(b'x');
    for shift in (0..8).rev() {
        let nibble = (value >> (shift * 4)) & 0xf;
        platform.logger_write(DIGITS[nibble as usize]);
    }
}

/// `core::fmt::Write` adapter over the logger, for panic messages and
/// other formatted output.
pub struct LoggerWriter<'a, P: Platform + ?Sized> {
    platform: &'a mut P,
}

impl<'a, P: Platform + ?Sized> LoggerWriter<'a, P> {
    pub const fn new(platform: &'a mut P) -> Self {
        Self { platform }
    }
}

impl<P: Platform + ?Sized> fmt::Write for LoggerWriter<'_, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print_str(&mut *self.platform, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;

    use super::*;
    use crate::test_utils::MockPlatform;

    #[test]
    fn test_print_hex() {
        let mut platform = MockPlatform::new();
        print_hex(&mut platform, 0xb);
        print_str(&mut platform, "\n");
        print_hex(&mut platform, 0xdead_beef);
        assert_eq!(platform.logger_str(), "0x0000000b\n0xdeadbeef");
    }

    #[test]
    fn test_logger_writer() {
        let mut platform = MockPlatform::new();
        write!(LoggerWriter::new(&mut platform), "exit {}", -3).unwrap();
        assert_eq!(platform.logger_str(), "exit -3");
    }
}
