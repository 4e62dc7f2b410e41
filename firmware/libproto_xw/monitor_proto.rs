use core::fmt;

use io::{Read, ProtoRead, Write, ProtoWrite, Error as IoError};
use crate::console::MONITOR_READY;

/// The rasterizer tile buffer holds one 32-bit pixel per 128-bit bus word.
pub const TILE_BASE: u32 = 0x0500_0000;
pub const TILE_STRIDE: u32 = 16;
pub const TILE_PIXELS: usize = 256;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<T> {
    UnknownPacket(u8),
    Io(IoError<T>)
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::UnknownPacket(byte) =>
                write!(f, "unknown packet {:#04x}", byte),
            &Error::Io(ref err) =>
                write!(f, "{}", err)
        }
    }
}

impl<T> From<IoError<T>> for Error<T> {
    fn from(value: IoError<T>) -> Error<T> {
        Error::Io(value)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Request {
    WriteWord { addr: u32, data: u32 },
    ReadWord { addr: u32 },
    WriteTile([u32; TILE_PIXELS]),
    ReadTile,
    Rasterize,
    EndFrame,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Request::WriteWord { addr, data } =>
                write!(f, "WriteWord {{ addr: {:#010x}, data: {:#010x} }}", addr, data),
            &Request::ReadWord { addr } =>
                write!(f, "ReadWord {{ addr: {:#010x} }}", addr),
            &Request::WriteTile(_) => write!(f, "WriteTile(..)"),
            &Request::ReadTile => write!(f, "ReadTile"),
            &Request::Rasterize => write!(f, "Rasterize"),
            &Request::EndFrame => write!(f, "EndFrame"),
        }
    }
}

impl Request {
    pub fn read_from<R>(reader: &mut R) -> Result<Self, Error<R::ReadError>>
        where R: Read + ?Sized
    {
        Ok(match reader.read_u8()? {
            0x00 => Request::WriteWord {
                addr: reader.read_u32()?,
                data: reader.read_u32()?,
            },
            0x01 => Request::ReadWord {
                addr: reader.read_u32()?,
            },
            0x02 => {
                let mut pixels = [0; TILE_PIXELS];
                for pixel in pixels.iter_mut() {
                    *pixel = reader.read_u32()?;
                }
                Request::WriteTile(pixels)
            }
            0x03 => Request::ReadTile,
            0x04 => Request::Rasterize,
            0x05 => Request::EndFrame,
            ty => return Err(Error::UnknownPacket(ty))
        })
    }

    pub fn write_to<W>(&self, writer: &mut W) -> Result<(), IoError<W::WriteError>>
        where W: Write + ?Sized
    {
        match *self {
            Request::WriteWord { addr, data } => {
                writer.write_u8(0x00)?;
                writer.write_u32(addr)?;
                writer.write_u32(data)?;
            }
            Request::ReadWord { addr } => {
                writer.write_u8(0x01)?;
                writer.write_u32(addr)?;
            }
            Request::WriteTile(ref pixels) => {
                writer.write_u8(0x02)?;
                for &pixel in pixels.iter() {
                    writer.write_u32(pixel)?;
                }
            }
            Request::ReadTile => writer.write_u8(0x03)?,
            Request::Rasterize => writer.write_u8(0x04)?,
            Request::EndFrame => writer.write_u8(0x05)?,
        }
        Ok(())
    }
}

/// The memory-mapped system as seen by the monitor.
pub trait Target {
    fn read_word(&mut self, addr: u32) -> u32;
    fn write_word(&mut self, addr: u32, data: u32);
    fn start_rasterizer(&mut self);
    fn rasterizer_busy(&mut self) -> bool;
    fn cycles(&mut self) -> u64;
}

fn tile_pixel_addr(index: usize) -> u32 {
    TILE_BASE + index as u32 * TILE_STRIDE
}

/// Announces readiness, then executes requests until the host ends the frame.
pub fn serve_frame<S, T, E>(stream: &mut S, target: &mut T) -> Result<(), IoError<E>>
    where S: Read<ReadError = E> + Write<WriteError = E> + ?Sized, T: Target + ?Sized
{
    stream.write_u8(MONITOR_READY)?;

    loop {
        let request = match Request::read_from(stream) {
            Ok(request) => request,
            Err(Error::UnknownPacket(ty)) => {
                warn!("skipping unknown request {:#04x}", ty);
                continue
            }
            Err(Error::Io(err)) => return Err(err)
        };
        trace!("request: {:?}", request);

        match request {
            Request::WriteWord { addr, data } =>
                target.write_word(addr, data),
            Request::ReadWord { addr } =>
                stream.write_u32(target.read_word(addr))?,
            Request::WriteTile(pixels) => {
                for (index, &pixel) in pixels.iter().enumerate() {
                    target.write_word(tile_pixel_addr(index), pixel)
                }
            }
            Request::ReadTile => {
                for index in 0..TILE_PIXELS {
                    stream.write_u32(target.read_word(tile_pixel_addr(index)))?
                }
            }
            Request::Rasterize => {
                let start = target.cycles();
                target.start_rasterizer();
                while target.rasterizer_busy() {}
                let elapsed = target.cycles().wrapping_sub(start);
                stream.write_u64(elapsed)?
            }
            Request::EndFrame => return Ok(())
        }
    }
}
