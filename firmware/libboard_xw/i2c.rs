//! Bit-banged I2C master.
//!
//! Every bus phase is built from quarter bit periods. The bus idles with
//! both lines released (high); between bytes the master leaves SCL low.

use core::fmt;

/// Open-drain access to one pair of bus lines.
pub trait Pins {
    /// Drives the lines; `true` releases a line so that it floats high.
    fn write(&mut self, scl: bool, sda: bool);

    /// Samples the actual line levels as `(scl, sda)`.
    fn read(&mut self) -> (bool, bool);

    /// Waits a quarter of a bit period.
    fn delay(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    ClockStretchTimeout,
    Nack,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::ClockStretchTimeout =>
                write!(f, "SCL held low by a slave for too long"),
            &Error::Nack =>
                write!(f, "no acknowledge from slave"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Line samples taken while waiting for a slave to release SCL.
pub const STRETCH_POLLS: u32 = 100_000;

pub struct I2c<P> {
    pins: P,
}

impl<P: Pins> I2c<P> {
    pub fn new(pins: P) -> I2c<P> {
        I2c { pins }
    }

    pub fn pins(&mut self) -> &mut P {
        &mut self.pins
    }

    pub fn into_pins(self) -> P {
        self.pins
    }

    fn set(&mut self, scl: bool, sda: bool) {
        self.pins.write(scl, sda);
        self.pins.delay();
    }

    /// Gives up with a stop condition so that SDA is released.
    fn wait_for_scl(&mut self) -> Result<()> {
        for _ in 0..STRETCH_POLLS {
            if self.pins.read().0 {
                return Ok(())
            }
        }
        self.stop();
        Err(Error::ClockStretchTimeout)
    }

    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.set(false, bit);
        self.pins.write(true, bit);
        self.wait_for_scl()?;
        self.pins.delay();
        self.set(false, bit);
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool> {
        self.set(false, true);
        self.pins.write(true, true);
        self.wait_for_scl()?;
        self.pins.delay();
        let bit = self.pins.read().1;
        self.set(false, true);
        Ok(bit)
    }

    pub fn start(&mut self) {
        // postcondition: SCL and SDA low
        self.set(true, true);
        self.set(true, false);
        self.set(false, false);
    }

    pub fn stop(&mut self) {
        // postcondition: SCL and SDA high
        self.set(false, false);
        self.set(true, false);
        self.set(true, true);
    }

    /// Shifts out one byte, MSB first. Returns whether the slave acknowledged.
    pub fn write(&mut self, data: u8) -> Result<bool> {
        for bit in (0..8).rev() {
            self.write_bit(data & (1 << bit) != 0)?;
        }
        Ok(!self.read_bit()?)
    }

    /// Shifts in one byte, MSB first, then acknowledges it if `ack` is set.
    pub fn read(&mut self, ack: bool) -> Result<u8> {
        let mut data = 0;
        for bit in (0..8).rev() {
            if self.read_bit()? {
                data |= 1 << bit
            }
        }
        self.write_bit(!ack)?;
        Ok(data)
    }

    fn write_acked(&mut self, data: u8) -> Result<()> {
        if self.write(data)? {
            Ok(())
        } else {
            self.stop();
            Err(Error::Nack)
        }
    }

    /// `address` is the 8-bit write address of the slave.
    pub fn write_reg(&mut self, address: u8, reg: u8, value: u8) -> Result<()> {
        self.start();
        self.write_acked(address & !1)?;
        self.write_acked(reg)?;
        self.write_acked(value)?;
        self.stop();
        Ok(())
    }

    pub fn read_reg(&mut self, address: u8, reg: u8) -> Result<u8> {
        self.start();
        self.write_acked(address & !1)?;
        self.write_acked(reg)?;
        self.start();
        self.write_acked(address | 1)?;
        let value = self.read(false)?;
        self.stop();
        Ok(value)
    }
}

/// The I2C lines of the display controller.
pub struct DisplayPins;

const DISPLAY_SCL: u8 = 1 << 0;
const DISPLAY_SDA: u8 = 1 << 1;

impl Pins for DisplayPins {
    fn write(&mut self, scl: bool, sda: bool) {
        use core::ptr::write_volatile;
        use crate::mem::DISPLAY_I2C_WRITE;

        let mut value = 0;
        if scl { value |= DISPLAY_SCL }
        if sda { value |= DISPLAY_SDA }
        unsafe { write_volatile(DISPLAY_I2C_WRITE as *mut u8, value) }
    }

    fn read(&mut self) -> (bool, bool) {
        use core::ptr::read_volatile;
        use crate::mem::DISPLAY_I2C_READ;

        let value = unsafe { read_volatile(DISPLAY_I2C_READ as *const u8) };
        (value & DISPLAY_SCL != 0, value & DISPLAY_SDA != 0)
    }

    fn delay(&mut self) {
        use crate::{clock, mem::CLOCK_FREQUENCY};

        // 400 kHz bus
        clock::spin_cycles(CLOCK_FREQUENCY / 400_000 / 4)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::sim::Slave;

    #[test]
    fn writes_register() {
        let mut i2c = I2c::new(Slave::new(0x72));
        i2c.write_reg(0x72, 0x41, 0x10).unwrap();
        assert_eq!(i2c.pins().writes, vec![(0x41, 0x10)]);
        assert_eq!(i2c.pins().regs[0x41], 0x10);
        assert_eq!(i2c.pins().read(), (true, true));
    }

    #[test]
    fn reads_register_with_repeated_start() {
        let mut slave = Slave::new(0x72);
        slave.regs[0x42] = 0b1010_0110;
        let mut i2c = I2c::new(slave);
        assert_eq!(i2c.read_reg(0x72, 0x42), Ok(0b1010_0110));
        assert!(i2c.pins().writes.is_empty());
    }

    #[test]
    fn reports_missing_slave() {
        let mut i2c = I2c::new(Slave::new(0x72));
        assert_eq!(i2c.write_reg(0x70, 0x41, 0x00), Err(Error::Nack));
        assert_eq!(i2c.read_reg(0x70, 0x42), Err(Error::Nack));
        assert!(i2c.pins().writes.is_empty());
        // The bus is released after the failed transfer.
        assert_eq!(i2c.pins().read(), (true, true));
    }

    #[test]
    fn bounded_clock_stretching() {
        let mut slave = Slave::new(0x72);
        slave.hold_scl = true;
        let mut i2c = I2c::new(slave);
        i2c.start();
        assert_eq!(i2c.write(0x72), Err(Error::ClockStretchTimeout));
    }

    #[test]
    fn stretch_timeout_releases_bus() {
        let mut slave = Slave::new(0x72);
        slave.hold_scl = true;
        let mut i2c = I2c::new(slave);
        assert_eq!(i2c.write_reg(0x72, 0x41, 0x10), Err(Error::ClockStretchTimeout));

        i2c.pins().hold_scl = false;
        assert_eq!(i2c.pins().read(), (true, true));
        i2c.write_reg(0x72, 0x41, 0x10).unwrap();
        assert_eq!(i2c.pins().writes, vec![(0x41, 0x10)]);
    }

    #[test]
    fn consecutive_transfers() {
        let mut i2c = I2c::new(Slave::new(0x72));
        i2c.write_reg(0x72, 0x98, 0x03).unwrap();
        i2c.write_reg(0x72, 0x9a, 0xe0).unwrap();
        assert_eq!(i2c.read_reg(0x72, 0x98), Ok(0x03));
        assert_eq!(i2c.read_reg(0x72, 0x9a), Ok(0xe0));
    }
}
