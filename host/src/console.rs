//! Host side of the device to host stream: console text and program
//! requests from the boot ROM.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crc::crc32;

use proto_xw::boot_proto;
use proto_xw::console::DeviceMessage;

use crate::device::{self, Device, Link};

/// Longest program name the boot ROM may ask for; longer names are truncated.
const MAX_NAME: usize = 256;

/// Where requested programs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    /// Requested names are paths relative to this directory.
    Directory(PathBuf),
    /// Every request is answered with this file.
    Fixed(PathBuf),
}

impl ProgramSource {
    pub fn resolve(&self, name: &str) -> PathBuf {
        match self {
            ProgramSource::Directory(root) => root.join(name),
            ProgramSource::Fixed(path) => path.clone(),
        }
    }
}

pub struct Session<W> {
    source: ProgramSource,
    output: W,
    programs_served: usize,
}

impl<W: Write> Session<W> {
    pub fn new(source: ProgramSource, output: W) -> Session<W> {
        Session { source, output, programs_served: 0 }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn programs_served(&self) -> usize {
        self.programs_served
    }

    /// Handles device messages until the monitor announces that it is
    /// ready for requests.
    pub fn run<D: Device + ?Sized>(&mut self, device: &mut D) -> Result<()> {
        let mut name = [0u8; MAX_NAME];
        loop {
            let message = DeviceMessage::read_from(&mut Link(&mut *device), &mut name)
                .map_err(device::Error::from)
                .context("cannot read device message")?;
            match message {
                DeviceMessage::Putc(byte) => self.putc(byte)?,
                DeviceMessage::LoadProgram(name) => {
                    let name = String::from_utf8_lossy(name).into_owned();
                    self.serve(device, &name)?
                }
                DeviceMessage::MonitorReady => {
                    self.output.flush()?;
                    return Ok(())
                }
            }
        }
    }

    fn putc(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])?;
        if byte == b'\n' {
            self.output.flush()?;
        }
        Ok(())
    }

    fn serve<D: Device + ?Sized>(&mut self, device: &mut D, name: &str) -> Result<()> {
        let path = self.source.resolve(name);
        info!("program requested: {} ({})", name, path.display());

        let image = fs::read(&path)
            .with_context(|| format!("cannot read program {}", path.display()))?;
        info!("serving {} bytes, CRC {:08x}", image.len(), crc32::checksum_ieee(&image));

        boot_proto::serve_program(&mut Link(&mut *device), &image)
            .map_err(device::Error::from)
            .context("cannot send program")?;
        device.flush()?;

        self.programs_served += 1;
        Ok(())
    }
}
