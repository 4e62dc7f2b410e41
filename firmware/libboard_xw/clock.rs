use crate::mem::CLOCK_FREQUENCY;

#[cfg(target_arch = "riscv32")]
pub fn cycles() -> u64 {
    riscv::register::mcycle::read64()
}

// There is no cycle CSR to read on the build host; advance a counter per
// read so that spin loops still terminate in unit tests.
#[cfg(not(target_arch = "riscv32"))]
pub fn cycles() -> u64 {
    use core::sync::atomic::{AtomicU64, Ordering};

    static CYCLES: AtomicU64 = AtomicU64::new(0);
    CYCLES.fetch_add(1, Ordering::Relaxed)
}

pub fn get_us() -> u64 {
    cycles() / (CLOCK_FREQUENCY / 1_000_000)
}

pub fn spin_cycles(interval: u64) {
    let start = cycles();
    while cycles().wrapping_sub(start) < interval {}
}

pub fn spin_us(interval: u64) {
    spin_cycles(interval * (CLOCK_FREQUENCY / 1_000_000))
}

/// Busy-wait source handed to drivers that need to pace themselves.
pub trait Delay {
    fn spin_cycles(&mut self, cycles: u64);
}

/// Delays on the CPU cycle counter.
pub struct CycleDelay;

impl Delay for CycleDelay {
    fn spin_cycles(&mut self, interval: u64) {
        spin_cycles(interval)
    }
}
