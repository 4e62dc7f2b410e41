//! Host tooling for xw: serves programs to the boot ROM, talks to the
//! monitor and runs simulation models of the RTL.

#[macro_use]
extern crate log;

pub mod device;
pub mod serial;
pub mod console;
pub mod monitor;
pub mod sim;

use std::num::ParseIntError;

/// Parses an address or data word, in hex with a `0x` prefix or in decimal.
pub fn parse_u32(text: &str) -> Result<u32, ParseIntError> {
    let text = text.replace('_', "");
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse()
    }
}
