use core::fmt::{self, Write};

use crate::bus::Bus;
use crate::sequencer::Sequencer;

macro_rules! log {
    ($logger:expr, $( $arg:expr ),+) => (
        if let &mut Some(ref mut f) = $logger {
            let _ = write!(f, $( $arg ),+);
        }
    )
}

/// Sweeps the capture clock of `group` over `steps` PLL phase steps from
/// the current phase, printing `1` where a read of any bit succeeds and `0`
/// where it fails. The phase is restored afterwards.
pub fn scan_dqs_en_phase<B: Bus>(sequencer: &mut Sequencer<B>, group: u32, steps: u32,
                                 logger: &mut Option<&mut dyn fmt::Write>) -> u32 {
    log!(logger, "DQS enable phase scan, group {}:\n", group);

    let mut working = 0;
    for _ in 0..steps {
        if sequencer.read_test(group, false, false).0 {
            working += 1;
            log!(logger, "1");
        } else {
            log!(logger, "0");
        }
        sequencer.phase_up(group);
    }
    for _ in 0..steps {
        sequencer.phase_down(group);
    }

    log!(logger, "\n");
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;
    use crate::sim::{self, SimPhy, GOOD_VFIFO};

    #[test]
    fn draws_pass_map() {
        let mut phy = SimPhy::new(3..=5);
        phy.vfifo[0] = GOOD_VFIFO;
        let mut sequencer = Sequencer::new(phy, sim::config(Protocol::Ddr3));

        let mut map = String::new();
        let working = {
            let mut logger: Option<&mut dyn fmt::Write> = Some(&mut map);
            scan_dqs_en_phase(&mut sequencer, 0, 8, &mut logger)
        };
        assert_eq!(working, 3);
        assert_eq!(map, "DQS enable phase scan, group 0:\n00011100\n");
        assert_eq!(sequencer.bus().phase(0), 0);
    }

    #[test]
    fn runs_without_logger() {
        let mut sequencer = Sequencer::new(SimPhy::without_window(), sim::config(Protocol::Ddr3));
        assert_eq!(scan_dqs_en_phase(&mut sequencer, 0, 4, &mut None), 0);
    }
}
