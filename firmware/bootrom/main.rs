#![no_std]
#![no_main]

extern crate proto_xw;
#[macro_use]
extern crate board_xw;

use core::{ptr, slice};

use board_xw::{boot, leds, panic};
use board_xw::uart::Uart;
use proto_xw::boot_proto;

/// Name the host resolves to the program image.
const PROGRAM: &str = env!("XW_PROGRAM");

fn program_ram() -> &'static mut [u8] {
    extern {
        static mut _sprogram: u8;
        static _max_program_size: u8;
    }

    unsafe {
        // The size is an absolute symbol; its address is the value.
        let size = ptr::addr_of!(_max_program_size) as usize;
        slice::from_raw_parts_mut(ptr::addr_of_mut!(_sprogram), size)
    }
}

fn load() -> Result<usize, boot_proto::Error<core::convert::Infallible>> {
    let mut uart = Uart;
    boot_proto::request_program(&mut uart, PROGRAM.as_bytes())?;
    boot_proto::load_program(&mut uart, program_ram(), leds::set)
}

#[no_mangle]
pub extern fn main() -> i32 {
    println!("");
    println!(r"__  ____      __");
    println!(r"\ \/ /\ \ /\ / /");
    println!(r" >  <  \ V  V / ");
    println!(r"/_/\_\  \_/\_/  ");
    println!("");
    println!("xw online");

    match load() {
        Ok(length) => {
            println!("program read successful ({} bytes)", length);
            leds::set(0);
            unsafe { boot::jump(program_ram().as_ptr() as usize) }
        }
        Err(err) => {
            println!("cannot load {}: {}", PROGRAM, err);
            println!("Halting.");
            loop {}
        }
    }
}

#[panic_handler]
fn panic_fmt(info: &core::panic::PanicInfo) -> ! {
    panic::report(info)
}
