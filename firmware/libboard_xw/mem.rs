//! Physical memory map of the xw system bus.

pub const LEDS: usize = 0x0100_0000;

pub const UART_BASE: usize = 0x0200_0000;

pub const DISPLAY_BASE: usize = 0x0300_0000;
pub const DISPLAY_STATUS: usize = DISPLAY_BASE + 0x0;
pub const DISPLAY_FRAMEBUFFER_ADDR: usize = DISPLAY_BASE + 0x4;
pub const DISPLAY_I2C_READ: usize = DISPLAY_BASE + 0x8;
pub const DISPLAY_I2C_WRITE: usize = DISPLAY_BASE + 0xc;

pub const RASTERIZER: usize = 0x0400_0000;

/// Tile buffer of the rasterizer. Every pixel occupies its own 128-bit bus
/// word, so consecutive pixels are `TILE_STRIDE` bytes apart.
pub const TILE_BASE: usize = proto_xw::monitor_proto::TILE_BASE as usize;
pub const TILE_STRIDE: usize = proto_xw::monitor_proto::TILE_STRIDE as usize;

pub const CLOCK_FREQUENCY: u64 = 100_000_000;
