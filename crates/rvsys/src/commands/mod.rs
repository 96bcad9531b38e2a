//! Command implementations.

mod run;
mod syscalls;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Run {
            script,
            layout,
            trap_banner,
            format,
        } => run::cmd_run(script, &layout.to_config(*trap_banner), *format),
        Commands::Syscalls => syscalls::cmd_syscalls(),
    }
}
