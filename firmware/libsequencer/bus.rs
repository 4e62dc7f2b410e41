use core::ptr::{read_volatile, write_volatile};

/// 32-bit register access on the sequencer bus.
pub trait Bus {
    fn write(&mut self, addr: u32, value: u32);
    fn read(&mut self, addr: u32) -> u32;
}

impl<'a, B: Bus + ?Sized> Bus for &'a mut B {
    fn write(&mut self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }

    fn read(&mut self, addr: u32) -> u32 {
        (**self).read(addr)
    }
}

/// Managers mapped directly into the CPU address space.
pub struct Mmio;

impl Bus for Mmio {
    fn write(&mut self, addr: u32, value: u32) {
        unsafe { write_volatile(addr as usize as *mut u32, value) }
    }

    fn read(&mut self, addr: u32) -> u32 {
        unsafe { read_volatile(addr as usize as *const u32) }
    }
}
