//! Framing of the device to host stream.
//!
//! The device has a single UART, so everything it sends starts with a
//! command byte that tells the host how to interpret what follows.

use core::fmt;

use io::{Read, ProtoRead, Write, ProtoWrite, Error as IoError};

/// One character of console text follows.
pub const PUTC: u8 = 0x00;
/// A NUL-terminated file name follows; the host answers with the program.
pub const LOAD_PROGRAM: u8 = 0x01;
/// The monitor is waiting for requests.
pub const MONITOR_READY: u8 = 0x02;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<T> {
    UnknownMessage(u8),
    Io(IoError<T>)
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::UnknownMessage(byte) =>
                write!(f, "unknown device message {:#04x}", byte),
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

#[derive(Debug, PartialEq, Eq)]
pub enum DeviceMessage<'a> {
    Putc(u8),
    LoadProgram(&'a [u8]),
    MonitorReady,
}

impl<'a> DeviceMessage<'a> {
    /// Decodes one message. A file name is stored in `name`, truncated to
    /// its length.
    pub fn read_from<R>(reader: &mut R, name: &'a mut [u8]) -> Result<Self, Error<R::ReadError>>
        where R: Read + ?Sized
    {
        Ok(match reader.read_u8()? {
            PUTC => DeviceMessage::Putc(reader.read_u8()?),
            LOAD_PROGRAM => {
                let len = reader.read_cstr(name)?;
                let name: &'a [u8] = name;
                DeviceMessage::LoadProgram(&name[..len])
            }
            MONITOR_READY => DeviceMessage::MonitorReady,
            byte => return Err(Error::UnknownMessage(byte))
        })
    }

    pub fn write_to<W>(&self, writer: &mut W) -> Result<(), IoError<W::WriteError>>
        where W: Write + ?Sized
    {
        match *self {
            DeviceMessage::Putc(byte) => {
                writer.write_u8(PUTC)?;
                writer.write_u8(byte)?;
            }
            DeviceMessage::LoadProgram(name) => {
                writer.write_u8(LOAD_PROGRAM)?;
                writer.write_cstr(name)?;
            }
            DeviceMessage::MonitorReady => {
                writer.write_u8(MONITOR_READY)?;
            }
        }
        Ok(())
    }
}
