//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rvsys::{EmulatorConfig, parse_u32};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for tool errors (bad script, bad config, failed expectation).
pub const EXIT_TOOL_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "rvsys")]
#[command(about = "Replay ECALL traps against the bare-metal RISC-V syscall handler")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a trap script and print the guest's console output
    Run {
        /// Trap script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Print the trap banner (cause, pc, syscall number) on every trap
        #[arg(long)]
        trap_banner: bool,

        /// Output format for the run summary
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the syscalls the handler services
    Syscalls,
}

/// Guest memory and heap layout.
#[derive(clap::Args, Clone, Debug)]
pub struct LayoutArgs {
    /// Guest memory base address
    #[arg(long, value_parser = parse_u32, default_value = "0x0")]
    pub memory_base: u32,

    /// Guest memory size in bytes
    #[arg(long, default_value = "65536")]
    pub memory_size: u64,

    /// First heap address (the initial break)
    #[arg(long, value_parser = parse_u32, default_value = "0x8000")]
    pub heap_start: u32,

    /// End of the heap; equal to --heap-start disables the heap
    #[arg(long, value_parser = parse_u32, default_value = "0xc000")]
    pub heap_end: u32,
}

impl LayoutArgs {
    pub const fn to_config(&self, trap_banner: bool) -> EmulatorConfig {
        EmulatorConfig {
            memory_base: self.memory_base,
            memory_size: self.memory_size,
            heap_start: self.heap_start,
            heap_end: self.heap_end,
            trap_banner,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Text,
    /// JSON output
    Json,
}
