use std::io;

use proto_xw::console::DeviceMessage;
use proto_xw::monitor_proto::{Request, TILE_PIXELS};
use xw_io::ProtoRead;

use crate::device::{Device, Error, Link, Result};

pub type Tile = [u32; TILE_PIXELS];

/// Issues monitor requests. Every request assumes the monitor has announced a
/// frame (see `wait_ready` and `console::Session::run`); `end_frame` hands
/// control back.
pub struct Client<'a, D: ?Sized> {
    device: &'a mut D,
}

impl<'a, D: Device + ?Sized> Client<'a, D> {
    pub fn new(device: &'a mut D) -> Client<'a, D> {
        Client { device }
    }

    /// Copies console output to `console` until the monitor announces a frame.
    pub fn wait_ready<W: io::Write>(&mut self, console: &mut W) -> Result<()> {
        let mut name = [0u8; 64];
        loop {
            match DeviceMessage::read_from(&mut Link(&mut *self.device), &mut name)? {
                DeviceMessage::Putc(byte) => console.write_all(&[byte])?,
                DeviceMessage::MonitorReady => {
                    console.flush()?;
                    return Ok(())
                }
                DeviceMessage::LoadProgram(name) => {
                    warn!("device asked for {} while waiting for the monitor",
                          String::from_utf8_lossy(name));
                    return Err(Error::Unrecognized)
                }
            }
        }
    }

    fn request(&mut self, request: &Request) -> Result<()> {
        debug!("request {:?}", request);
        request.write_to(&mut Link(&mut *self.device))?;
        Ok(())
    }

    pub fn write_word(&mut self, addr: u32, data: u32) -> Result<()> {
        self.request(&Request::WriteWord { addr, data })?;
        self.device.flush()
    }

    pub fn read_word(&mut self, addr: u32) -> Result<u32> {
        self.request(&Request::ReadWord { addr })?;
        self.device.flush()?;
        self.device.read_u32()
    }

    pub fn write_tile(&mut self, pixels: &Tile) -> Result<()> {
        self.request(&Request::WriteTile(*pixels))?;
        self.device.flush()
    }

    pub fn read_tile(&mut self) -> Result<Tile> {
        self.request(&Request::ReadTile)?;
        self.device.flush()?;
        let mut pixels = [0; TILE_PIXELS];
        for pixel in pixels.iter_mut() {
            *pixel = self.device.read_u32()?;
        }
        Ok(pixels)
    }

    /// Runs the rasterizer over the tile buffer, returning the cycles it took.
    pub fn rasterize(&mut self) -> Result<u64> {
        self.request(&Request::Rasterize)?;
        self.device.flush()?;
        Ok(Link(&mut *self.device).read_u64()?)
    }

    pub fn end_frame(&mut self) -> Result<()> {
        self.request(&Request::EndFrame)?;
        self.device.flush()
    }
}
