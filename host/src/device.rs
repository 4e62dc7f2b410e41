//! Byte-level access to a running xw system.

use std::collections::VecDeque;
use std::io;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("unable to achieve baud rate {requested} (got {actual})")]
    BaudRate { requested: u32, actual: u32 },
    #[error("device closed the connection")]
    Closed,
    #[error("unexpected message from device")]
    Unrecognized,
    #[error("unknown device message {0:#04x}")]
    UnknownMessage(u8),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<xw_io::Error<Error>> for Error {
    fn from(value: xw_io::Error<Error>) -> Error {
        match value {
            xw_io::Error::UnexpectedEof => Error::Closed,
            xw_io::Error::Other(err) => err
        }
    }
}

impl From<proto_xw::console::Error<Error>> for Error {
    fn from(value: proto_xw::console::Error<Error>) -> Error {
        match value {
            proto_xw::console::Error::UnknownMessage(byte) => Error::UnknownMessage(byte),
            proto_xw::console::Error::Io(err) => err.into()
        }
    }
}

pub trait Device {
    fn read_byte(&mut self) -> Result<u8>;
    fn write_byte(&mut self, value: u8) -> Result<()>;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0; 4];
        for byte in bytes.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(LittleEndian::read_u32(&bytes))
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        let mut bytes = [0; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.write_bytes(&bytes)
    }
}

impl<'a, D: Device + ?Sized> Device for &'a mut D {
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        (**self).write_byte(value)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        (**self).write_byte(value)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Exposes a device through the byte-stream traits of the firmware, so that
/// the protocol codecs shared with the device run unchanged on the host.
pub struct Link<'a, D: ?Sized>(pub &'a mut D);

impl<'a, D: Device + ?Sized> xw_io::Read for Link<'a, D> {
    type ReadError = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match buf.first_mut() {
            Some(byte) => {
                *byte = self.0.read_byte()?;
                Ok(1)
            }
            None => Ok(0)
        }
    }
}

impl<'a, D: Device + ?Sized> xw_io::Write for Link<'a, D> {
    type WriteError = Error;
    type FlushError = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.0.flush()
    }
}

/// A device that replays canned input and records everything written to it.
/// Reading past the end of the input reports a closed connection.
#[derive(Debug, Default)]
pub struct BufferDevice {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl BufferDevice {
    pub fn new(input: &[u8]) -> BufferDevice {
        BufferDevice { input: input.iter().cloned().collect(), output: Vec::new() }
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().cloned())
    }
}

impl Device for BufferDevice {
    fn read_byte(&mut self) -> Result<u8> {
        self.input.pop_front().ok_or(Error::Closed)
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.output.push(value);
        Ok(())
    }
}
