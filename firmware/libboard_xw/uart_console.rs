use core::fmt;

use proto_xw::console::PUTC;
use crate::uart;

/// Text output for the host console. Every byte travels as a PUTC message,
/// since the UART is shared with the boot and monitor protocols.
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        for c in s.bytes() {
            uart::write_u8(PUTC);
            uart::write_u8(c);
        }

        Ok(())
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ({
        use core::fmt::Write;
        let _ = write!($crate::uart_console::Console, $($arg)*);
    })
}

#[macro_export]
macro_rules! println {
    () => (print!("\n"));
    ($fmt:expr) => (print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => (print!(concat!($fmt, "\n"), $($arg)*));
}
