//! Run command.

use std::io::{self, Write};
use std::path::Path;

use rvsys::{Emulator, EmulatorConfig, HaltReason, RunReport, Script};
use tracing::{error, info, warn};

use crate::cli::{EXIT_SUCCESS, EXIT_TOOL_ERROR, OutputFormat};

/// Handle the `run` command.
///
/// Returns the guest's exit status (see [`process_exit_code`]), 1 for an
/// unhandled trap cause, or `EXIT_TOOL_ERROR` if the script could not be
/// replayed.
pub fn cmd_run(script_path: &Path, config: &EmulatorConfig, format: OutputFormat) -> i32 {
    let script = match Script::from_file(script_path) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, path = %script_path.display(), "failed to load script");
            return EXIT_TOOL_ERROR;
        }
    };
    info!(path = %script_path.display(), commands = script.len(), "loaded script");

    let mut emulator = match Emulator::new(config) {
        Ok(emu) => emu,
        Err(e) => {
            error!(error = %e, "failed to set up emulator");
            return EXIT_TOOL_ERROR;
        }
    };

    let report = match emulator.run(&script) {
        Ok(report) => report,
        Err(e) => {
            // Whatever the guest printed before the failure is still useful.
            if let Err(io_err) = write_console(&mut io::stderr(), emulator.platform().console()) {
                warn!(error = %io_err, "failed to write console output");
            }
            error!(error = %e, "replay failed");
            return EXIT_TOOL_ERROR;
        }
    };

    match format {
        OutputFormat::Text => {
            if let Err(e) = write_console(&mut io::stdout(), &report.console) {
                error!(error = %e, "failed to write console output");
                return EXIT_TOOL_ERROR;
            }
            print_text_summary(&report);
        }
        OutputFormat::Json => {
            if let Err(e) = write_console(&mut io::stderr(), &report.console) {
                warn!(error = %e, "failed to write console output");
            }
            report.print_json();
        }
    }

    report.exit_code().map_or_else(
        || {
            warn!("script ended before the guest exited");
            EXIT_SUCCESS
        },
        process_exit_code,
    )
}

/// Map a guest exit status onto a process exit code.
///
/// Only the low 8 bits survive `exit(2)`, so `-1` becomes 255. A nonzero
/// status whose low byte is 0 (256, 512, ...) becomes 1 rather than
/// reporting success.
const fn process_exit_code(status: i32) -> i32 {
    match status & 0xff {
        0 if status != 0 => 1,
        code => code,
    }
}

fn write_console(out: &mut impl Write, console: &[u8]) -> io::Result<()> {
    out.write_all(console)?;
    out.flush()
}

fn print_text_summary(report: &RunReport) {
    match report.halt {
        Some(HaltReason::Exit { status }) => eprintln!("Exit status: {status}"),
        Some(HaltReason::UnhandledTrap { cause, mepc }) => {
            eprintln!("Unhandled trap: {cause} at {mepc:#010x}");
        }
        None => eprintln!("Guest still running"),
    }
    eprintln!("Traps: {}", report.traps);
    eprintln!("Heap break: {:#010x}", report.final_break);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_exit_code() {
        assert_eq!(process_exit_code(0), 0);
        assert_eq!(process_exit_code(42), 42);
        assert_eq!(process_exit_code(255), 255);
        assert_eq!(process_exit_code(-1), 255);
        assert_eq!(process_exit_code(256), 1);
        assert_eq!(process_exit_code(-256), 1);
        assert_eq!(process_exit_code(257), 1);
    }

    #[test]
    fn test_guest_exit_status_reaches_process() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"ecall exit 256\n").unwrap();

        let code = cmd_run(file.path(), &EmulatorConfig::default(), OutputFormat::Json);
        assert_eq!(code, 1);
    }
}
