use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::device::{Device, Error, Result};

/// Rate of the xw UART.
pub const DEFAULT_BAUD_RATE: u32 = 460_800;

const READ_TIMEOUT: Duration = Duration::from_millis(100);

pub struct SerialDevice {
    port: Box<dyn SerialPort>,
}

impl SerialDevice {
    /// Opens `path` and checks that the port really runs at `baud_rate`;
    /// some adapters silently round to the nearest rate they support.
    pub fn open(path: &str, baud_rate: u32) -> Result<SerialDevice> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;

        let actual = port.baud_rate()?;
        if actual != baud_rate {
            return Err(Error::BaudRate { requested: baud_rate, actual })
        }

        info!("opened {} at {} baud", path, baud_rate);
        Ok(SerialDevice { port })
    }
}

/// Blocks until a byte arrives. Read timeouts are retried; end of stream
/// means the port went away.
fn read_byte_from<R: Read + ?Sized>(port: &mut R) -> Result<u8> {
    let mut buf = [0];
    loop {
        match port.read(&mut buf) {
            Ok(0) => return Err(Error::Closed),
            Ok(_) => return Ok(buf[0]),
            Err(ref err) if err.kind() == io::ErrorKind::TimedOut => (),
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => (),
            Err(err) => return Err(err.into())
        }
    }
}

impl Device for SerialDevice {
    fn read_byte(&mut self) -> Result<u8> {
        read_byte_from(&mut *self.port)
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.port.write_all(&[value])?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}
