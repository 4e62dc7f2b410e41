//! Program download from the host.
//!
//! After the device sends a LOAD PROGRAM message, the host answers with the
//! image length (`u32`), the image itself, and the CRC-32 (IEEE) of the
//! image (`u32`).

use core::fmt;
use crc::crc32;

use io::{Read, ProtoRead, Write, ProtoWrite, Error as IoError};
use crate::console::DeviceMessage;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<T> {
    TooLarge { length: usize, capacity: usize },
    CrcMismatch { expected: u32, actual: u32 },
    Io(IoError<T>)
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::TooLarge { length, capacity } =>
                write!(f, "program is {} bytes, only {} bytes available", length, capacity),
            &Error::CrcMismatch { expected, actual } =>
                write!(f, "program CRC failed (actual {:08x}, expected {:08x})", actual, expected),
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

pub fn request_program<W>(writer: &mut W, name: &[u8]) -> Result<(), IoError<W::WriteError>>
    where W: Write + ?Sized
{
    DeviceMessage::LoadProgram(name).write_to(writer)
}

/// Receives a program into `ram`, passing every byte to `on_byte` as it
/// arrives. Returns the program length.
pub fn load_program<R, F>(reader: &mut R, ram: &mut [u8], mut on_byte: F)
        -> Result<usize, Error<R::ReadError>>
    where R: Read + ?Sized, F: FnMut(u8)
{
    let length = reader.read_u32()? as usize;
    if length > ram.len() {
        return Err(Error::TooLarge { length, capacity: ram.len() })
    }

    for byte in ram[..length].iter_mut() {
        *byte = reader.read_u8()?;
        on_byte(*byte);
    }

    let expected = reader.read_u32()?;
    let actual = crc32::checksum_ieee(&ram[..length]);
    if actual != expected {
        return Err(Error::CrcMismatch { expected, actual })
    }
    Ok(length)
}

pub fn serve_program<W>(writer: &mut W, image: &[u8]) -> Result<(), IoError<W::WriteError>>
    where W: Write + ?Sized
{
    writer.write_u32(image.len() as u32)?;
    writer.write_all(image)?;
    writer.write_u32(crc32::checksum_ieee(image))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use io::Cursor;

    fn served(image: &[u8]) -> Vec<u8> {
        let mut writer = Cursor::new(Vec::new());
        serve_program(&mut writer, image).unwrap();
        writer.into_inner()
    }

    #[test]
    fn wire_layout() {
        let wire = served(b"\x13\x00\x00\x00");
        assert_eq!(&wire[..8], b"\x04\x00\x00\x00\x13\x00\x00\x00");
        assert_eq!(wire.len(), 12);
    }

    #[test]
    fn loads_and_reports_bytes() {
        let image = b"\x6f\x00\x00\x00\x13\x05\x10\x00";
        let wire = served(image);
        let mut ram = [0u8; 16];
        let mut seen = Vec::new();

        let length = load_program(&mut Cursor::new(&wire[..]), &mut ram, |byte| seen.push(byte));
        assert_eq!(length, Ok(8));
        assert_eq!(&ram[..8], &image[..]);
        assert_eq!(&seen[..], &image[..]);
    }

    #[test]
    fn rejects_oversized_program() {
        let wire = served(&[0xaa; 32]);
        let mut ram = [0u8; 16];
        let result = load_program(&mut Cursor::new(&wire[..]), &mut ram, |_| ());
        assert_eq!(result, Err(Error::TooLarge { length: 32, capacity: 16 }));
        assert_eq!(ram, [0; 16]);
    }

    #[test]
    fn detects_corruption() {
        let mut wire = served(b"abcdefgh");
        wire[6] ^= 0x20;
        let mut ram = [0u8; 8];
        let result = load_program(&mut Cursor::new(&wire[..]), &mut ram, |_| ());
        match result {
            Err(Error::CrcMismatch { expected, actual }) => {
                assert_eq!(expected, crc32::checksum_ieee(b"abcdefgh"));
                assert_eq!(actual, crc32::checksum_ieee(b"abCdefgh"));
            }
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn truncated_stream() {
        let wire = served(b"abcd");
        let mut ram = [0u8; 8];
        let result = load_program(&mut Cursor::new(&wire[..6]), &mut ram, |_| ());
        assert_eq!(result, Err(Error::Io(IoError::UnexpectedEof)));
    }
}
