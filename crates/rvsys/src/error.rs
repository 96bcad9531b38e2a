use thiserror::Error;

use crate::config::ConfigError;
use crate::memory::MemoryError;
use crate::script::ScriptError;

/// Emulator errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("heap error: {0}")]
    Heap(#[from] rvsys_ecall::HeapError),
    #[error("line {line}: expected a0 = {expected:#x}, got {actual:#x}")]
    ExpectationFailed {
        line: usize,
        expected: u32,
        actual: u32,
    },
    #[error("line {line}: `expect` needs a preceding trap that resumed")]
    NothingToExpect { line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
