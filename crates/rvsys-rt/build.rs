fn main() {
    // The heap window comes from the final binary's linker script, which
    // must define `_heap_start` and `_heap_end` (equal when there is no
    // heap). Library build scripts can't pass link args to the binary, so
    // set them in its .cargo/config.toml:
    //
    // [target.riscv32imac-unknown-none-elf]
    // rustflags = ["-C", "link-arg=-T<path>/link.x"]

    println!("cargo:rerun-if-changed=build.rs");
}
