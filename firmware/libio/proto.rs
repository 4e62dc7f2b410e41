use byteorder::{ByteOrder, LittleEndian};

use crate::{Read, Write, Error as IoError};

/// Field decoding for the xw wire format. Every multi-byte integer on the
/// wire is little-endian.
pub trait ProtoRead {
    type ReadError;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::ReadError>;

    #[inline]
    fn read_u8(&mut self) -> Result<u8, Self::ReadError> {
        let mut bytes = [0; 1];
        self.read_exact(&mut bytes)?;
        Ok(bytes[0])
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, Self::ReadError> {
        let mut bytes = [0; 4];
        self.read_exact(&mut bytes)?;
        Ok(LittleEndian::read_u32(&bytes))
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64, Self::ReadError> {
        let mut bytes = [0; 8];
        self.read_exact(&mut bytes)?;
        Ok(LittleEndian::read_u64(&bytes))
    }

    /// Reads a NUL-terminated string into `buf`, returning its length without
    /// the terminator. Bytes beyond the capacity of `buf` are consumed and
    /// dropped, so the stream stays in sync.
    fn read_cstr(&mut self, buf: &mut [u8]) -> Result<usize, Self::ReadError> {
        let mut len = 0;
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                return Ok(len.min(buf.len()))
            }
            if len < buf.len() {
                buf[len] = byte;
            }
            len += 1;
        }
    }
}

pub trait ProtoWrite {
    type WriteError;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::WriteError>;

    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<(), Self::WriteError> {
        let bytes = [value; 1];
        self.write_all(&bytes)
    }

    #[inline]
    fn write_u32(&mut self, value: u32) -> Result<(), Self::WriteError> {
        let mut bytes = [0; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.write_all(&bytes)
    }

    #[inline]
    fn write_u64(&mut self, value: u64) -> Result<(), Self::WriteError> {
        let mut bytes = [0; 8];
        LittleEndian::write_u64(&mut bytes, value);
        self.write_all(&bytes)
    }

    #[inline]
    fn write_cstr(&mut self, value: &[u8]) -> Result<(), Self::WriteError> {
        self.write_all(value)?;
        self.write_u8(0)
    }
}

impl<T> ProtoRead for T where T: Read + ?Sized {
    type ReadError = IoError<T::ReadError>;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::ReadError> {
        T::read_exact(self, buf)
    }
}

impl<T> ProtoWrite for T where T: Write + ?Sized {
    type WriteError = IoError<T::WriteError>;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::WriteError> {
        T::write_all(self, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cursor;

    #[test]
    fn integers_are_little_endian() {
        let mut storage = [0u8; 12];
        {
            let mut writer = Cursor::new(&mut storage[..]);
            writer.write_u32(0xdeadbeef).unwrap();
            writer.write_u64(0x1122334455667788).unwrap();
        }
        assert_eq!(&storage[..4], &[0xef, 0xbe, 0xad, 0xde]);

        let mut reader = Cursor::new(&storage[..]);
        assert_eq!(reader.read_u32().unwrap(), 0xdeadbeef);
        assert_eq!(reader.read_u64().unwrap(), 0x1122334455667788);
    }

    #[test]
    fn cstr_is_truncated_but_fully_consumed() {
        let mut reader = Cursor::new(&b"program.bin\0\x2a"[..]);
        let mut name = [0u8; 7];
        let len = reader.read_cstr(&mut name).unwrap();
        assert_eq!(&name[..len], b"program");
        assert_eq!(reader.read_u8().unwrap(), 0x2a);
    }
}
