use core::convert::Infallible;
use core::ptr::{read_volatile, write_volatile};

use io::{Read, Write};
use crate::mem::UART_BASE;

const TX_STATUS: *const u8 = (UART_BASE + 0x00) as *const u8;
const TX_WRITE:  *mut u8   = (UART_BASE + 0x10) as *mut u8;
const RX_STATUS: *const u8 = (UART_BASE + 0x20) as *const u8;
const RX_READ:   *const u8 = (UART_BASE + 0x30) as *const u8;

const STATUS_READY: u8 = 1 << 0;

pub fn write_u8(byte: u8) {
    unsafe {
        while read_volatile(TX_STATUS) & STATUS_READY == 0 {}
        write_volatile(TX_WRITE, byte)
    }
}

pub fn read_u8() -> u8 {
    unsafe {
        while read_volatile(RX_STATUS) & STATUS_READY == 0 {}
        read_volatile(RX_READ)
    }
}

/// Blocking byte stream over the UART. Reads return at least one byte.
pub struct Uart;

impl Read for Uart {
    type ReadError = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        for byte in buf.iter_mut() {
            *byte = read_u8();
        }
        Ok(buf.len())
    }
}

impl Write for Uart {
    type WriteError = Infallible;
    type FlushError = Infallible;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        for &byte in buf {
            write_u8(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
