//! Panic handlers for guest programs.
//!
//! Pick at most one via feature flags:
//! - `panic-halt`: Infinite loop
//! - `panic-logger`: Print the panic message to the logger, signal the
//!   host, then spin

#[cfg(all(feature = "panic-halt", feature = "panic-logger"))]
compile_error!("Features `panic-halt` and `panic-logger` are mutually exclusive");

#[cfg(all(feature = "panic-halt", not(test)))]
#[panic_handler]
fn panic_halt(_info: &core::panic::PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(all(feature = "panic-logger", not(test)))]
#[panic_handler]
fn panic_logger(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;

    use rvsys_ecall::{LoggerWriter, Platform};

    use crate::platform::BarePlatform;

    let mut platform = BarePlatform::new();
    let mut writer = LoggerWriter::new(&mut platform);
    let _ = writeln!(writer, "{info}");
    platform.signal_host_halt();
    loop {
        core::hint::spin_loop();
    }
}
