use core::arch::asm;

/// Transfers control to a freshly loaded program. The instruction fetch path
/// is synchronized with the data writes that put the program in RAM first.
pub unsafe fn jump(addr: usize) -> ! {
    asm!(
        "fence.i",
        "jr {addr}",
        addr = in(reg) addr,
        options(noreturn)
    )
}
