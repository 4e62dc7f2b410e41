use core::ptr::write_volatile;

use crate::mem::LEDS;

pub fn set(value: u8) {
    unsafe { write_volatile(LEDS as *mut u8, value) }
}

/// Software PWM that fades an LED in and out.
///
/// The phase counter wraps every 256 ticks; the LED is lit while the low
/// byte of the phase is below the duty cycle. Every time the phase wraps the
/// duty cycle moves one step towards its current target, 256 on the way up
/// and 0 on the way down.
///
/// A full breath therefore takes 512 PWM periods, 131072 ticks, which is
/// slower than stepping the duty cycle on every tick.
#[derive(Debug, Clone, Default)]
pub struct Breather {
    phase: u32,
    duty: u32,
    falling: bool,
}

impl Breather {
    pub const fn new() -> Breather {
        Breather { phase: 0, duty: 0, falling: false }
    }

    pub fn duty(&self) -> u32 {
        self.duty
    }

    /// Advances one PWM step and returns whether the LED is on.
    pub fn tick(&mut self) -> bool {
        let on = (self.phase & 0xff) < self.duty;

        self.phase = self.phase.wrapping_add(1);
        if self.phase & 0xff == 0 {
            if self.falling {
                self.duty -= 1;
                if self.duty == 0 {
                    self.falling = false;
                }
            } else {
                self.duty += 1;
                if self.duty == 256 {
                    self.falling = true;
                }
            }
        }

        on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_during_period(breather: &mut Breather) -> usize {
        (0..256).filter(|_| breather.tick()).count()
    }

    #[test]
    fn starts_dark() {
        let mut breather = Breather::new();
        assert_eq!(lit_during_period(&mut breather), 0);
        assert_eq!(breather.duty(), 1);
    }

    #[test]
    fn duty_cycle_tracks_lit_ticks() {
        let mut breather = Breather::new();
        for expected in 0..256 {
            assert_eq!(lit_during_period(&mut breather), expected);
        }
        assert_eq!(breather.duty(), 256);
        assert_eq!(lit_during_period(&mut breather), 256);
    }

    #[test]
    fn fades_back_out() {
        let mut breather = Breather::new();
        for _ in 0..256 {
            lit_during_period(&mut breather);
        }
        assert_eq!(breather.duty(), 256);
        for _ in 0..256 {
            lit_during_period(&mut breather);
        }
        assert_eq!(breather.duty(), 0);
        assert_eq!(lit_during_period(&mut breather), 0);
        assert_eq!(breather.duty(), 1);
    }
}
