#![no_std]
#![no_main]

#[macro_use]
extern crate log;
extern crate proto_xw;
#[macro_use]
extern crate board_xw;

use core::ptr::{read_volatile, write_volatile};

use board_xw::{clock, mem, panic};
use board_xw::uart::Uart;
use board_xw::uart_logger::ConsoleLogger;
use proto_xw::monitor_proto::{self, Target};

/// The live system bus.
struct Bus;

impl Target for Bus {
    fn read_word(&mut self, addr: u32) -> u32 {
        unsafe { read_volatile(addr as usize as *const u32) }
    }

    fn write_word(&mut self, addr: u32, data: u32) {
        unsafe { write_volatile(addr as usize as *mut u32, data) }
    }

    fn start_rasterizer(&mut self) {
        unsafe { write_volatile(mem::RASTERIZER as *mut u32, 1) }
    }

    fn rasterizer_busy(&mut self) -> bool {
        unsafe { read_volatile(mem::RASTERIZER as *const u32) != 0 }
    }

    fn cycles(&mut self) -> u64 {
        clock::cycles()
    }
}

#[no_mangle]
pub extern fn main() -> i32 {
    ConsoleLogger::register();
    println!("Ready for commands!");

    let mut uart = Uart;
    let mut bus = Bus;
    let mut frames = 0u32;
    loop {
        match monitor_proto::serve_frame(&mut uart, &mut bus) {
            Ok(()) => {
                frames = frames.wrapping_add(1);
                debug!("frame {} done", frames);
            }
            // The UART never fails; a frame only ends early on a closed stream.
            Err(err) => warn!("frame aborted: {}", err)
        }
    }
}

#[panic_handler]
fn panic_fmt(info: &core::panic::PanicInfo) -> ! {
    panic::report(info)
}
