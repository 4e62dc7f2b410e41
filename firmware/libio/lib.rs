#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Byte streams for targets without `std::io`: the UART, in-memory buffers
//! and, on the host, the serial link all implement `Read` and `Write`.

#[cfg(feature = "alloc")]
extern crate alloc;
extern crate byteorder;

use core::convert::Infallible;
use core::fmt;
use core::result;

pub mod proto;

pub use proto::{ProtoRead, ProtoWrite};

pub type Result<T, E> = result::Result<T, Error<E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<T> {
    /// The stream ended, or stopped accepting bytes, mid-transfer.
    UnexpectedEof,
    Other(T)
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::UnexpectedEof =>
                write!(f, "stream ended mid-transfer"),
            &Error::Other(ref err) =>
                write!(f, "{}", err)
        }
    }
}

impl<T> From<T> for Error<T> {
    fn from(value: T) -> Error<T> {
        Error::Other(value)
    }
}

pub trait Read {
    type ReadError;

    /// Reads at most `buf.len()` bytes. Zero means the stream has ended.
    fn read(&mut self, buf: &mut [u8]) -> result::Result<usize, Self::ReadError>;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::ReadError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => return Err(Error::UnexpectedEof),
                count => filled += count
            }
        }
        Ok(())
    }
}

pub trait Write {
    type WriteError;
    type FlushError;

    /// Writes some prefix of `buf`, returning its length.
    fn write(&mut self, buf: &[u8]) -> result::Result<usize, Self::WriteError>;

    fn flush(&mut self) -> result::Result<(), Self::FlushError>;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::WriteError> {
        let mut written = 0;
        while written < buf.len() {
            match self.write(&buf[written..])? {
                0 => return Err(Error::UnexpectedEof),
                count => written += count
            }
        }
        Ok(())
    }
}

impl<'a, R: Read + ?Sized> Read for &'a mut R {
    type ReadError = R::ReadError;

    fn read(&mut self, buf: &mut [u8]) -> result::Result<usize, Self::ReadError> {
        R::read(self, buf)
    }
}

impl<'a, W: Write + ?Sized> Write for &'a mut W {
    type WriteError = W::WriteError;
    type FlushError = W::FlushError;

    fn write(&mut self, buf: &[u8]) -> result::Result<usize, Self::WriteError> {
        W::write(self, buf)
    }

    fn flush(&mut self) -> result::Result<(), Self::FlushError> {
        W::flush(self)
    }
}

/// An in-memory stream over a byte buffer. Writes into a slice stop at its
/// end; writes into a vector grow it.
#[derive(Debug, Clone)]
pub struct Cursor<T> {
    inner: T,
    pos: usize,
}

impl<T> Cursor<T> {
    pub fn new(inner: T) -> Cursor<T> {
        Cursor { inner, pos: 0 }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<T: AsRef<[u8]>> Read for Cursor<T> {
    type ReadError = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> result::Result<usize, Infallible> {
        let remaining = &self.inner.as_ref()[self.pos..];
        let count = buf.len().min(remaining.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.pos += count;
        Ok(count)
    }
}

impl<'a> Write for Cursor<&'a mut [u8]> {
    type WriteError = Infallible;
    type FlushError = Infallible;

    fn write(&mut self, buf: &[u8]) -> result::Result<usize, Infallible> {
        let remaining = &mut self.inner[self.pos..];
        let count = buf.len().min(remaining.len());
        remaining[..count].copy_from_slice(&buf[..count]);
        self.pos += count;
        Ok(count)
    }

    fn flush(&mut self) -> result::Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Write for Cursor<alloc::vec::Vec<u8>> {
    type WriteError = Infallible;
    type FlushError = Infallible;

    fn write(&mut self, buf: &[u8]) -> result::Result<usize, Infallible> {
        self.inner.truncate(self.pos);
        self.inner.extend_from_slice(buf);
        self.pos += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> result::Result<(), Infallible> {
        Ok(())
    }
}
