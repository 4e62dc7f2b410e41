//! Calibration sequencer for the UniPHY-style DDR3/DDR2/LPDDR2 PHY.
//!
//! The PHY is driven through three managers reachable from the sequencer
//! bus: the PHY manager (status and FIFO control), the read/write manager
//! (which runs command programs from its instruction ROM) and the PLL
//! manager (which steps the capture clock phases).

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

pub mod bus;
pub mod regs;
pub mod config;
pub mod sequencer;
pub mod scan;
#[cfg(test)]
mod sim;

pub use bus::{Bus, Mmio};
pub use config::{Layout, InstRom, Geometry, Protocol, GroupLayout, Params};
pub use sequencer::{Sequencer, Config, Status, Stage, Substage, Failure, DelayLoop, delay_loop_counters,
                    ns_to_mem_clocks};
pub use scan::scan_dqs_en_phase;
