#![no_std]
#![no_main]

#[macro_use]
extern crate log;
#[macro_use]
extern crate board_xw;

use core::ptr;

use board_xw::{adv7513, clock, leds, panic};
use board_xw::clock::CycleDelay;
use board_xw::display::{self, BouncingBox, Display, DisplayScanout};
use board_xw::i2c::{DisplayPins, I2c};
use board_xw::uart_logger::ConsoleLogger;

const FRAME_PACING_CYCLES: u64 = 1000;
const BOX_SIZE: usize = 150;

static mut FRAMEBUFFER0: [u16; display::PIXELS] = [0; display::PIXELS];
static mut FRAMEBUFFER1: [u16; display::PIXELS] = [0; display::PIXELS];

#[no_mangle]
pub extern fn main() -> i32 {
    ConsoleLogger::register();

    let mut i2c = I2c::new(DisplayPins);
    match adv7513::init(&mut i2c, &mut CycleDelay) {
        Ok(()) => info!("HDMI transmitter ready"),
        Err(err) => error!("HDMI transmitter: {}", err)
    }

    // Only this function ever touches the frames.
    let (first, second) = unsafe {
        (&mut *ptr::addr_of_mut!(FRAMEBUFFER0), &mut *ptr::addr_of_mut!(FRAMEBUFFER1))
    };
    let mut display = Display::new(&mut first[..], &mut second[..], DisplayScanout);
    let mut breather = leds::Breather::new();
    let mut square = BouncingBox::new(BOX_SIZE);
    let mut first_frame = true;

    loop {
        clock::spin_cycles(FRAME_PACING_CYCLES);
        leds::set(breather.tick() as u8);

        let frame_start = clock::cycles();
        let mut back_buffer = display.back_buffer();
        back_buffer.clear(display::BLACK);
        let clear_end = clock::cycles();

        square.step();
        square.draw(&mut back_buffer, display::WHITE);
        let frame_end = clock::cycles();

        if first_frame {
            println!("Total frame cycles: {}", frame_end - frame_start);
            println!("Clear cycles: {}", clear_end - frame_start);
            println!("Box cycles: {}", frame_end - clear_end);
            first_frame = false;
        }

        display.swap_buffers(true);
    }
}

#[panic_handler]
fn panic_fmt(info: &core::panic::PanicInfo) -> ! {
    panic::report(info)
}
