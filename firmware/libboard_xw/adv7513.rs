//! ADV7513 HDMI transmitter bring-up.

use core::fmt;

use crate::clock::Delay;
use crate::i2c::{self, I2c, Pins};

pub const ADDRESS: u8 = 0x72;

const REG_POWER_DOWN: u8 = 0x41;
const REG_HPD_MONITOR_SENSE: u8 = 0x42;
const HPD: u8 = 1 << 6;

const POWER_UP_CYCLES: u64 = 30_000_000;
const HPD_POLL_CYCLES: u64 = 100_000;
pub const HPD_POLLS: u32 = 10_000;

/// Registers that must be set to fixed values for correct operation.
const FIXED_REGS: [(u8, u8); 8] = [
    (0x98, 0x03),
    (0x9a, 0xe0),
    (0x9c, 0x30),
    (0x9d, 0x01),
    (0xa2, 0xa4),
    (0xa3, 0xa4),
    (0xe0, 0xd0),
    (0xf9, 0x00),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    I2c(i2c::Error),
    NoHotPlug,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::I2c(ref err) =>
                write!(f, "I2C error: {}", err),
            &Error::NoHotPlug =>
                write!(f, "no monitor detected (HPD low)"),
        }
    }
}

impl From<i2c::Error> for Error {
    fn from(value: i2c::Error) -> Error {
        Error::I2c(value)
    }
}

pub fn init<P: Pins, D: Delay>(i2c: &mut I2c<P>, delay: &mut D) -> Result<(), Error> {
    delay.spin_cycles(POWER_UP_CYCLES);

    let mut polls = 0;
    while i2c.read_reg(ADDRESS, REG_HPD_MONITOR_SENSE)? & HPD == 0 {
        polls += 1;
        if polls == HPD_POLLS {
            return Err(Error::NoHotPlug)
        }
        delay.spin_cycles(HPD_POLL_CYCLES);
    }

    i2c.write_reg(ADDRESS, REG_POWER_DOWN, 0)?;
    for &(reg, value) in FIXED_REGS.iter() {
        i2c.write_reg(ADDRESS, reg, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::sim::Slave;

    #[derive(Default)]
    struct Elapsed(u64);

    impl Delay for Elapsed {
        fn spin_cycles(&mut self, cycles: u64) {
            self.0 += cycles
        }
    }

    #[test]
    fn programs_transmitter_once_plugged() {
        let mut slave = Slave::new(ADDRESS);
        slave.regs[0x41] = 0x50;
        slave.regs[0x42] = 0x60;
        let mut i2c = I2c::new(slave);
        let mut delay = Elapsed::default();

        init(&mut i2c, &mut delay).unwrap();
        assert_eq!(delay.0, POWER_UP_CYCLES);

        let writes = &i2c.pins().writes;
        assert_eq!(writes[0], (0x41, 0x00));
        assert_eq!(&writes[1..], &FIXED_REGS[..]);
    }

    #[test]
    fn gives_up_without_monitor() {
        let mut i2c = I2c::new(Slave::new(ADDRESS));
        let mut delay = Elapsed::default();

        assert_eq!(init(&mut i2c, &mut delay), Err(Error::NoHotPlug));
        assert!(i2c.pins().writes.is_empty());
        assert_eq!(delay.0, POWER_UP_CYCLES + (HPD_POLLS as u64 - 1) * HPD_POLL_CYCLES);
    }

    #[test]
    fn propagates_bus_errors() {
        let mut bus = I2c::new(Slave::new(0x70));
        let mut delay = Elapsed::default();
        assert_eq!(init(&mut bus, &mut delay), Err(Error::I2c(i2c::Error::Nack)));
    }
}
