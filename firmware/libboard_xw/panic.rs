use core::panic::PanicInfo;

use crate::{clock, leds};

/// Shared panic behaviour of the images: light every LED, print the panic on
/// the console, then blink at 2 Hz forever.
pub fn report(info: &PanicInfo) -> ! {
    leds::set(0xff);

    if let Some(location) = info.location() {
        print!("panic at {}:{}:{}", location.file(), location.line(), location.column());
    } else {
        print!("panic at unknown location");
    }
    println!(": {}", info.message());

    let mut lit = true;
    loop {
        clock::spin_us(250_000);
        lit = !lit;
        leds::set(if lit { 0xff } else { 0x00 });
    }
}
