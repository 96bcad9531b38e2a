//! Syscalls command.

use rvsys::Syscall;

use crate::cli::EXIT_SUCCESS;

pub fn cmd_syscalls() -> i32 {
    println!("{:>5}  {:<6} args", "nr", "name");
    for sys in Syscall::ALL {
        println!("{:>5}  {:<6} {}", sys.number(), sys.name(), sys.arg_count());
    }
    EXIT_SUCCESS
}
