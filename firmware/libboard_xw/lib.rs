#![cfg_attr(not(test), no_std)]

extern crate io;
extern crate log;
extern crate proto_xw;
#[cfg(target_arch = "riscv32")]
extern crate riscv;

pub mod mem;
pub mod clock;
pub mod uart;
#[cfg(feature = "uart_console")]
#[macro_use]
pub mod uart_console;
#[cfg(feature = "uart_console")]
pub mod uart_logger;
#[cfg(feature = "uart_console")]
pub mod panic;
pub mod leds;
pub mod i2c;
pub mod adv7513;
pub mod display;
#[cfg(target_arch = "riscv32")]
pub mod boot;
