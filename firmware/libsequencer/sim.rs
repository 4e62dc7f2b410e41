//! Register-level model of a PHY with a single read window, for tests.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::bus::Bus;
use crate::config::{Layout, InstRom, Geometry, Protocol, GroupLayout};
use crate::regs::{rw_mgr, phy_mgr, pll_mgr, RTL_VFIFO_SIZE};
use crate::sequencer::{Config, Sequencer};

pub const PHY_MGR: u32 = 0x0008_8000;
pub const RW_MGR: u32 = 0x0009_0000;
pub const PLL_MGR: u32 = 0x0005_8000;

pub const GOOD_VFIFO: u32 = 5;
const T_WL: u32 = 6;

pub fn rom() -> InstRom {
    InstRom {
        idle_loop1: 0x10,
        idle_loop2: 0x11,
        init_reset_0_cke_0: 0x12,
        init_reset_0_cke_0_inloop: 0x13,
        init_reset_1_cke_0: 0x14,
        init_reset_1_cke_0_inloop_1: 0x15,
        init_cke_0: 0x16,
        init_cke_0_inloop: 0x17,
        nop: 0x18,
        zqcl: 0x19,
        refresh: 0x1a,
        precharge_all: 0x1b,
        mrs0_dll_reset: 0x20,
        mrs0_user: 0x21,
        mrs1: 0x22,
        mrs2: 0x23,
        mrs3: 0x24,
        emr: 0x30,
        emr2: 0x31,
        emr3: 0x32,
        emr_ocd_enable: 0x33,
        mr_dll_reset: 0x34,
        mr_calib: 0x35,
        mr_user: 0x36,
        mr63_reset: 0x40,
        mr10_zqc: 0x41,
        mr1_calib: 0x42,
        mr1_user: 0x43,
        mr2: 0x44,
        mr3: 0x45,
        guaranteed_write: 0x50,
        guaranteed_write_wait: [0x51, 0x52, 0x53, 0x54],
        read_b2b: 0x60,
        read_b2b_wait1: 0x61,
        read_b2b_wait2: 0x62,
        clear_dqs_enable: 0x63,
        activate_0_and_1: 0x70,
        activate_0_and_1_wait1: 0x71,
        activate_0_and_1_wait2: 0x72,
    }
}

pub fn config(protocol: Protocol) -> Config {
    Config {
        layout: Layout { phy_mgr: PHY_MGR, rw_mgr: RW_MGR, pll_mgr: PLL_MGR },
        rom: rom(),
        geometry: Geometry {
            dq_per_read_dqs: 8,
            dq_per_write_dqs: 8,
            virtual_groups_per_read_dqs: 1,
            data_width: 8,
            data_mask_width: 1,
            read_dqs_width: 1,
            afi_rate_ratio: 2,
            afi_clk_freq: 150,
        },
        protocol,
        groups: GroupLayout::X8,
    }
}

/// Reads of group `g` succeed while the capture clock phase of the group is
/// inside `window` and its VFIFO sits at `GOOD_VFIFO`.
pub struct SimPhy {
    window: Option<RangeInclusive<i32>>,
    phases: BTreeMap<u32, i32>,
    pub vfifo: [u32; 4],
    /// Overrides the read result of the next read tests.
    pub errors: Option<u32>,
    last_errors: u32,
    writes: Vec<(u32, u32)>,
}

impl SimPhy {
    pub fn new(window: RangeInclusive<i32>) -> SimPhy {
        SimPhy {
            window: Some(window),
            phases: BTreeMap::new(),
            vfifo: [0; 4],
            errors: None,
            last_errors: !0,
            writes: Vec::new(),
        }
    }

    pub fn without_window() -> SimPhy {
        SimPhy { window: None, ..SimPhy::new(0..=0) }
    }

    pub fn phase_at(&self, addr: u32) -> i32 {
        self.phases.get(&addr).cloned().unwrap_or(0)
    }

    pub fn phase(&self, capture_clk: u32) -> i32 {
        self.phase_at(PLL_MGR + (capture_clk << 2))
    }

    pub fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.writes.iter()
            .filter(|&&(a, _)| a == addr)
            .map(|&(_, value)| value)
            .collect()
    }

    /// Programs started on a single group.
    pub fn runs(&self) -> Vec<u32> {
        self.writes.iter()
            .filter(|&&(a, _)| a >= RW_MGR + rw_mgr::RUN_SINGLE_GROUP && a < RW_MGR + rw_mgr::RUN_ALL_GROUPS)
            .map(|&(_, value)| value)
            .collect()
    }

    fn read_errors(&self, group: u32) -> u32 {
        if let Some(errors) = self.errors {
            return errors
        }
        let phase = self.phase(Sequencer::<SimPhy>::capture_clock(group));
        match self.window {
            Some(ref window) if window.contains(&phase) && self.vfifo[group as usize] == GOOD_VFIFO => 0,
            _ => !0
        }
    }
}

impl Bus for SimPhy {
    fn write(&mut self, addr: u32, value: u32) {
        self.writes.push((addr, value));

        if addr >= PLL_MGR && addr < PLL_MGR + 0x100 {
            let phase = self.phases.entry(addr).or_insert(0);
            match value {
                pll_mgr::INCR => *phase += 1,
                pll_mgr::DECR => *phase -= 1,
                _ => panic!("bad PLL command {}", value)
            }
        } else if addr == PHY_MGR + phy_mgr::CMD_INC_VFIFO_HR {
            let vfifo = &mut self.vfifo[value as usize];
            *vfifo = (*vfifo + 1) % RTL_VFIFO_SIZE;
        } else if addr >= RW_MGR && addr < RW_MGR + 0x800 && value == rom().read_b2b {
            let group = ((addr - RW_MGR) & 0x3ff) >> 2;
            self.last_errors = self.read_errors(group);
        }
    }

    fn read(&mut self, addr: u32) -> u32 {
        match addr {
            RW_MGR => self.last_errors,
            _ if addr == PHY_MGR + phy_mgr::MEM_T_WL => T_WL,
            _ => 0
        }
    }
}
