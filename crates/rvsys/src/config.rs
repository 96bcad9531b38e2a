//! Emulator configuration.

use rvsys_ecall::DispatchConfig;
use thiserror::Error;

/// Default guest memory: 64 KiB at address 0.
pub const DEFAULT_MEMORY_BASE: u32 = 0;
pub const DEFAULT_MEMORY_SIZE: u64 = 64 * 1024;

/// Default heap window inside the default memory.
pub const DEFAULT_HEAP_START: u32 = 0x8000;
pub const DEFAULT_HEAP_END: u32 = 0xc000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("heap start {start:#x} is above heap end {end:#x}")]
    InvertedHeap { start: u32, end: u32 },
    #[error("heap {start:#x}..{end:#x} is outside guest memory {base:#x}+{size:#x}")]
    HeapOutsideMemory {
        start: u32,
        end: u32,
        base: u32,
        size: u64,
    },
}

/// Guest layout and dispatcher options for one emulator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmulatorConfig {
    pub memory_base: u32,
    pub memory_size: u64,
    pub heap_start: u32,
    pub heap_end: u32,
    /// Print the trap banner diagnostics on every trap.
    pub trap_banner: bool,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            memory_base: DEFAULT_MEMORY_BASE,
            memory_size: DEFAULT_MEMORY_SIZE,
            heap_start: DEFAULT_HEAP_START,
            heap_end: DEFAULT_HEAP_END,
            trap_banner: false,
        }
    }
}

impl EmulatorConfig {
    /// Check that the heap window is ordered and lies inside guest memory.
    ///
    /// A disabled heap (`heap_start == heap_end`) is valid anywhere.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = (self.heap_start, self.heap_end);
        if start > end {
            return Err(ConfigError::InvertedHeap { start, end });
        }
        let memory_end = u64::from(self.memory_base) + self.memory_size;
        if start != end && (start < self.memory_base || u64::from(end) > memory_end) {
            return Err(ConfigError::HeapOutsideMemory {
                start,
                end,
                base: self.memory_base,
                size: self.memory_size,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            trap_banner: self.trap_banner,
        }
    }
}

/// Parse a 32-bit value written in hex (`0x` prefix) or decimal.
///
/// # Errors
///
/// Returns a message suitable for CLI and script diagnostics.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.trim().replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(neg) = s.strip_prefix('-') {
        // Negative values wrap, so -1 is 0xffffffff.
        neg.parse::<u32>().map(u32::wrapping_neg)
    } else {
        s.parse::<u32>()
    };
    parsed.map_err(|e| format!("invalid number `{s}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EmulatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_heap() {
        let config = EmulatorConfig {
            heap_start: 0x2000,
            heap_end: 0x1000,
            ..EmulatorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedHeap {
                start: 0x2000,
                end: 0x1000
            })
        );
    }

    #[test]
    fn test_heap_outside_memory() {
        let config = EmulatorConfig {
            heap_start: 0xf000,
            heap_end: 0x1_0001,
            ..EmulatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HeapOutsideMemory { .. })
        ));
    }

    #[test]
    fn test_disabled_heap_anywhere() {
        let config = EmulatorConfig {
            heap_start: 0xdead_0000,
            heap_end: 0xdead_0000,
            ..EmulatorConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32("0x1000"), Ok(0x1000));
        assert_eq!(parse_u32("0X8000_0000"), Ok(0x8000_0000));
        assert_eq!(parse_u32("214"), Ok(214));
        assert_eq!(parse_u32("-1"), Ok(u32::MAX));
        assert!(parse_u32("0x1_0000_0000").is_err());
        assert!(parse_u32("brk").is_err());
    }
}
