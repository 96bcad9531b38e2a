//! Machine trap vector for RV32.
//!
//! Saves the caller-saved registers the C handler may clobber (a0 carries
//! the result back), calls `default_exception_handler_c` and returns with
//! `mret`. The handler has already moved mepc past the ECALL.

use core::arch::global_asm;

#[cfg(not(target_feature = "e"))]
global_asm!(
    r#"
.section .text._trap_vector
.global _trap_vector
.type _trap_vector, @function
.align 4
_trap_vector:
    addi sp, sp, -64
    sw ra, 0(sp)
    sw t0, 4(sp)
    sw t1, 8(sp)
    sw t2, 12(sp)
    sw t3, 16(sp)
    sw t4, 20(sp)
    sw t5, 24(sp)
    sw t6, 28(sp)
    sw a1, 32(sp)
    sw a2, 36(sp)
    sw a3, 40(sp)
    sw a4, 44(sp)
    sw a5, 48(sp)
    sw a6, 52(sp)
    sw a7, 56(sp)

    # a0..a7 are still the program's; a0 comes back as the result
    call default_exception_handler_c

    lw ra, 0(sp)
    lw t0, 4(sp)
    lw t1, 8(sp)
    lw t2, 12(sp)
    lw t3, 16(sp)
    lw t4, 20(sp)
    lw t5, 24(sp)
    lw t6, 28(sp)
    lw a1, 32(sp)
    lw a2, 36(sp)
    lw a3, 40(sp)
    lw a4, 44(sp)
    lw a5, 48(sp)
    lw a6, 52(sp)
    lw a7, 56(sp)
    addi sp, sp, 64
    mret

.size _trap_vector, . - _trap_vector
"#
);

#[cfg(target_feature = "e")]
compile_error!("`trap-vector` needs a7, which RV32E doesn't have");
