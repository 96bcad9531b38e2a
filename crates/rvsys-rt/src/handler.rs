//! C-ABI trap entry.

use core::cell::UnsafeCell;

use rvsys_ecall::{DispatchConfig, ExceptionDispatcher, HeapAllocator, TrapOutcome};
use rvsys_isa::TrapContext;

use crate::platform::BarePlatform;

unsafe extern "C" {
    static _heap_start: u8;
    static _heap_end: u8;
}

const CONFIG: DispatchConfig = DispatchConfig {
    trap_banner: cfg!(feature = "trap-banner"),
};

/// The one dispatcher, created on the first trap.
struct DispatcherCell(UnsafeCell<Option<ExceptionDispatcher>>);

// SAFETY: single hart, and traps don't nest (mstatus.MIE is cleared on
// entry and the handler never re-enables it).
unsafe impl Sync for DispatcherCell {}

static DISPATCHER: DispatcherCell = DispatcherCell(UnsafeCell::new(None));

/// Heap window laid out by the linker script.
fn linker_heap() -> HeapAllocator {
    let start = (&raw const _heap_start) as usize as u32;
    let end = (&raw const _heap_end) as usize as u32;
    HeapAllocator::new(start, end).unwrap_or(HeapAllocator::disabled(start))
}

/// Called by the trap vector with the interrupted program's a0..a7.
///
/// Returns the value to restore into a0. For `exit` and unhandled causes
/// it never returns.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn default_exception_handler_c(
    a0: u32,
    a1: u32,
    a2: u32,
    a3: u32,
    a4: u32,
    a5: u32,
    a6: u32,
    a7: u32,
) -> u32 {
    let mcause: u32;
    let mepc: u32;
    // SAFETY: reading machine CSRs from machine mode.
    unsafe {
        core::arch::asm!("csrr {0}, mcause", out(reg) mcause);
        core::arch::asm!("csrr {0}, mepc", out(reg) mepc);
    }
    let ctx = TrapContext::new(mcause, mepc, [a0, a1, a2, a3, a4, a5, a6, a7]);

    // SAFETY: see `DispatcherCell`; this is the only live reference.
    let slot = unsafe { &mut *DISPATCHER.0.get() };
    let dispatcher = slot.get_or_insert_with(|| ExceptionDispatcher::new(linker_heap(), CONFIG));

    let mut platform = BarePlatform::new();
    match dispatcher.handle_trap(&mut platform, &ctx) {
        TrapOutcome::Resume { a0, .. } => a0,
        TrapOutcome::Halted(_) => loop {
            core::hint::spin_loop();
        },
    }
}
