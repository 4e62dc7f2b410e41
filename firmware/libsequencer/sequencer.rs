use core::convert::TryFrom;
use core::fmt;

use crate::bus::Bus;
use crate::config::{Layout, InstRom, Geometry, Protocol, GroupLayout, Params};
use crate::regs::{rw_mgr, phy_mgr, pll_mgr, RTL_VFIFO_SIZE, MAX_PHASE_STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Nil = 0,
    Vfifo = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substage {
    Nil = 0,
    GuaranteedRead = 1,
    DqsEnPhase = 2,
    VfifoCenter = 3,
}

pub const NO_GROUP: u32 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub error_stage: Stage,
    pub error_substage: Substage,
    pub error_group: u32,
    pub write_latency: u32,
}

impl Status {
    pub const fn new() -> Status {
        Status {
            error_stage: Stage::Nil,
            error_substage: Substage::Nil,
            error_group: NO_GROUP,
            write_latency: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    pub status: Status,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "calibration failed at stage {:?}, substage {:?}",
               self.status.error_stage, self.status.error_substage)?;
        if self.status.error_group != NO_GROUP {
            write!(f, ", group {}", self.status.error_group)?;
        }
        Ok(())
    }
}

/// Loop counters of the ROM idle loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayLoop {
    pub inner: u8,
    pub outer: u8,
    pub c_loop: u16,
}

fn to_afi_clocks(clocks: u32, afi_rate_ratio: u32) -> u32 {
    clocks / afi_rate_ratio + (clocks % afi_rate_ratio != 0) as u32
}

/// Memory clocks in `nanoseconds`, saturating at `u32::MAX`.
pub fn ns_to_mem_clocks(nanoseconds: u32, geometry: &Geometry) -> u32 {
    let period_ps = 1_000_000 / geometry.afi_clk_freq as u64;
    let clocks = 1000 * nanoseconds as u64 / period_ps * geometry.afi_rate_ratio as u64;
    u32::try_from(clocks).unwrap_or(u32::MAX)
}

/// Splits a wait of `clocks` memory clocks into idle loop counters. The ROM
/// loops test before decrementing, so each runs one more time than its
/// counter says.
pub fn delay_loop_counters(clocks: u32, afi_rate_ratio: u32) -> DelayLoop {
    let afi_clocks = to_afi_clocks(clocks, afi_rate_ratio);

    if afi_clocks == 0 {
        DelayLoop { inner: 0, outer: 0, c_loop: 0 }
    } else if afi_clocks <= 0x100 {
        DelayLoop { inner: (afi_clocks - 1) as u8, outer: 0, c_loop: 0 }
    } else if afi_clocks <= 0x10000 {
        DelayLoop { inner: 0xff, outer: ((afi_clocks - 1) >> 8) as u8, c_loop: 0 }
    } else {
        DelayLoop { inner: 0xff, outer: 0xff, c_loop: ((afi_clocks - 1) >> 16) as u16 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub layout: Layout,
    pub rom: InstRom,
    pub geometry: Geometry,
    pub protocol: Protocol,
    pub groups: GroupLayout,
}

pub struct Sequencer<B> {
    bus: B,
    config: Config,
    params: Params,
    status: Status,
}

impl<B: Bus> Sequencer<B> {
    pub fn new(bus: B, config: Config) -> Sequencer<B> {
        let params = Params::new(&config.geometry);
        Sequencer { bus, config, params, status: Status::new() }
    }

    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    fn rw(&mut self, offset: u32, value: u32) {
        let addr = self.config.layout.rw_mgr + offset;
        self.bus.write(addr, value)
    }

    fn phy(&mut self, offset: u32, value: u32) {
        let addr = self.config.layout.phy_mgr + offset;
        self.bus.write(addr, value)
    }

    fn run(&mut self, program: u32) {
        self.rw(rw_mgr::RUN_SINGLE_GROUP, program)
    }

    fn load(&mut self, counter: usize, count: u32, jump: u32) {
        self.rw(rw_mgr::LOAD_CNTR[counter], count);
        self.rw(rw_mgr::LOAD_JUMP_ADD[counter], jump);
    }

    fn fail(&mut self, group: u32, substage: Substage) {
        self.status.error_stage = Stage::Vfifo;
        self.status.error_substage = substage;
        self.status.error_group = group;
    }

    pub fn soft_reset(&mut self) {
        self.rw(rw_mgr::SOFT_RESET, 0)
    }

    pub fn initialize(&mut self) {
        // Initial LFIFO is max
        self.phy(phy_mgr::PHY_RLAT, 0xf);
        // Calibration owns the path to memory until handoff.
        self.phy(phy_mgr::MUX_SEL, 1);
        // Memory clock is not stable yet.
        self.phy(phy_mgr::RESET_MEM_STBL, 0);
        self.phy(phy_mgr::CAL_STATUS, 0);

        self.params = Params::new(&self.config.geometry);
    }

    pub fn set_rank_and_odt_mask(&mut self, rank: u32) {
        let odt_mask_0 = 0x0;
        let odt_mask_1 = 0x0;
        let cs_and_odt_mask =
            (0xff & !(1 << rank)) |
            ((0xff & odt_mask_0) << 8) |
            ((0xff & odt_mask_1) << 16);
        self.rw(rw_mgr::SET_CS_AND_ODT_MASK, cs_and_odt_mask)
    }

    pub fn delay_for_n_mem_clocks(&mut self, clocks: u32) {
        let afi_rate_ratio = self.config.geometry.afi_rate_ratio;
        let afi_clocks = to_afi_clocks(clocks, afi_rate_ratio);
        let counters = delay_loop_counters(clocks, afi_rate_ratio);
        let idle_loop1 = self.config.rom.idle_loop1;
        let idle_loop2 = self.config.rom.idle_loop2;

        // The ROM has
        //
        //    IDLE_LOOP2: jnz cntr0, TARGET_A
        //    IDLE_LOOP1: jnz cntr1, TARGET_B
        //                return
        //
        // A single loop jumps to IDLE_LOOP1 only; nested loops send both
        // counters back to IDLE_LOOP2.
        if afi_clocks <= 0x100 {
            self.load(1, counters.inner as u32, idle_loop1);
            self.run(idle_loop1);
        } else {
            self.rw(rw_mgr::LOAD_CNTR[0], counters.inner as u32);
            self.rw(rw_mgr::LOAD_CNTR[1], counters.outer as u32);
            self.rw(rw_mgr::LOAD_JUMP_ADD[0], idle_loop2);
            self.rw(rw_mgr::LOAD_JUMP_ADD[1], idle_loop2);
            for _ in 0..=counters.c_loop {
                self.run(idle_loop2);
            }
        }
    }

    pub fn delay_for_n_ns(&mut self, nanoseconds: u32) {
        let clocks = ns_to_mem_clocks(nanoseconds, &self.config.geometry);
        self.delay_for_n_mem_clocks(clocks)
    }

    pub fn mem_initialize(&mut self) {
        let rom = self.config.rom;
        match self.config.protocol {
            Protocol::Ddr3 => {
                // Reset and CKE are broadcast to all ranks.
                self.rw(rw_mgr::SET_CS_AND_ODT_MASK, rw_mgr::RANK_ALL);

                // Memory RESET asserted, tINIT
                self.load(0, 0x2, rom.init_reset_0_cke_0);
                self.rw(rw_mgr::LOAD_CNTR[1], 0x2);
                self.rw(rw_mgr::LOAD_JUMP_ADD[1], rom.init_reset_0_cke_0_inloop);
                self.run(rom.init_reset_0_cke_0);

                self.phy(phy_mgr::RESET_MEM_STBL, 1);

                // RESET released
                self.load(0, 0x2, rom.init_reset_1_cke_0);
                self.rw(rw_mgr::LOAD_CNTR[1], 0x2);
                self.rw(rw_mgr::LOAD_JUMP_ADD[1], rom.init_reset_1_cke_0_inloop_1);
                self.run(rom.init_reset_1_cke_0);

                // tXPR
                self.delay_for_n_mem_clocks(250);

                self.run(rom.mrs2);
                self.run(rom.mrs3);
                self.run(rom.mrs1);
                self.run(rom.mrs0_dll_reset);
                self.run(rom.zqcl);

                // tZQinit = tDLLK
                self.delay_for_n_mem_clocks(512);
            }
            Protocol::Ddr2 => {
                // CKE low, tINIT
                self.load(0, 0x2, rom.init_cke_0);
                self.rw(rw_mgr::LOAD_CNTR[1], 0x2);
                self.rw(rw_mgr::LOAD_JUMP_ADD[1], rom.init_cke_0_inloop);
                self.run(rom.init_cke_0);

                self.phy(phy_mgr::RESET_MEM_STBL, 1);

                // CKE high
                self.run(rom.nop);
                self.delay_for_n_ns(400);

                self.run(rom.precharge_all);
                self.run(rom.emr2);
                self.run(rom.emr3);
                self.run(rom.emr);
                self.run(rom.mr_dll_reset);
                self.run(rom.precharge_all);

                // Two refreshes spaced by tREF
                self.run(rom.refresh);
                self.delay_for_n_ns(200);
                self.run(rom.refresh);
                self.delay_for_n_ns(200);

                self.run(rom.mr_calib);
                // OCD defaults, then OCD exit
                self.run(rom.emr_ocd_enable);
                self.run(rom.emr);

                // DLL lock takes 200 clocks from the DLL reset.
                self.delay_for_n_mem_clocks(200);
            }
            Protocol::Lpddr2 => {
                // CKE low, tINIT1
                self.load(0, 0x10, rom.init_cke_0);
                self.run(rom.init_cke_0);

                // tINIT3
                self.delay_for_n_ns(200_000);

                self.phy(phy_mgr::RESET_MEM_STBL, 1);

                self.run(rom.mr63_reset);
                // tINIT5
                self.delay_for_n_ns(10_000);

                self.run(rom.mr10_zqc);
                // tZQINIT
                self.delay_for_n_ns(1000);

                self.run(rom.mr1_calib);
                self.run(rom.mr2);
                self.run(rom.mr3);
            }
        }
    }

    /// Programs the user mode register settings and hands the memory over.
    pub fn mem_handoff(&mut self) {
        let rom = self.config.rom;
        self.run(rom.precharge_all);
        match self.config.protocol {
            Protocol::Ddr3 => {
                self.run(rom.mrs2);
                self.run(rom.mrs3);
                self.run(rom.mrs1);
                self.run(rom.mrs0_user);
            }
            Protocol::Ddr2 => {
                self.run(rom.emr2);
                self.run(rom.emr3);
                self.run(rom.emr);
                self.run(rom.mr_user);
            }
            Protocol::Lpddr2 => {
                self.run(rom.mr1_user);
                self.run(rom.mr2);
                self.run(rom.mr3);
            }
        }
    }

    /// Writes the constant bursts that the read tests check against.
    pub fn load_read_patterns(&mut self) {
        let rom = self.config.rom;
        self.load(0, 0x20, rom.guaranteed_write_wait[0]);
        self.load(1, 0x20, rom.guaranteed_write_wait[1]);
        self.load(2, 0x02, rom.guaranteed_write_wait[2]);
        self.load(3, 0x02, rom.guaranteed_write_wait[3]);
        self.run(rom.guaranteed_write);
    }

    /// Reads back the patterns with dummy reads inserted. Returns whether the
    /// test passed (every bit correct with `all_correct`, any bit otherwise)
    /// and the per-bit result.
    pub fn read_test(&mut self, group: u32, all_correct: bool, all_groups: bool) -> (bool, u32) {
        let rom = self.config.rom;
        let geometry = self.config.geometry;
        let virtual_groups = geometry.virtual_groups_per_read_dqs;
        let shift = geometry.dq_per_read_dqs / virtual_groups;

        self.load(1, 0x10, rom.read_b2b_wait1);
        self.load(2, 0x10, rom.read_b2b_wait2);
        self.load(0, if all_groups { 0x06 } else { 0x32 }, rom.read_b2b);
        self.load(3, if all_groups { geometry.read_dqs_width * virtual_groups - 1 } else { 0 },
                  rom.read_b2b);

        let run = if all_groups { rw_mgr::RUN_ALL_GROUPS } else { rw_mgr::RUN_SINGLE_GROUP };
        let mut tmp_bit_chk: u32 = 0;
        for vg in (0..virtual_groups).rev() {
            // Pointers to a known state
            self.phy(phy_mgr::CMD_FIFO_RESET, 0);
            self.rw(rw_mgr::RESET_READ_DATAPATH, 0);

            tmp_bit_chk = tmp_bit_chk.checked_shl(shift).unwrap_or(0);
            self.rw(run + ((group * virtual_groups + vg) << 2), rom.read_b2b);
            let errors = self.bus.read(self.config.layout.rw_mgr);
            tmp_bit_chk |= self.params.read_correct_mask_vg & !errors;
        }
        let bit_chk = self.params.read_correct_mask & tmp_bit_chk;

        self.rw(rw_mgr::RUN_SINGLE_GROUP + (group << 2), rom.clear_dqs_enable);

        let pass = if all_correct {
            bit_chk == self.params.read_correct_mask
        } else {
            bit_chk != 0
        };
        (pass, bit_chk)
    }

    /// Capture clock that latches the data of `group`.
    pub fn capture_clock(group: u32) -> u32 {
        if group == 2 { 1 } else { group }
    }

    fn step_phase(&mut self, capture_clk: u32, command: u32) {
        let base = self.config.layout.pll_mgr;
        self.bus.write(base + (capture_clk << 2), command);
        if self.config.protocol == Protocol::Lpddr2 {
            self.bus.write(base + capture_clk + 0x4, command);
        }
    }

    pub fn phase_up(&mut self, group: u32) {
        self.step_phase(Self::capture_clock(group), pll_mgr::INCR)
    }

    pub fn phase_down(&mut self, group: u32) {
        self.step_phase(Self::capture_clock(group), pll_mgr::DECR)
    }

    /// Finds a working VFIFO setting and centers the DQS enable phase in the
    /// window where reads succeed.
    pub fn find_dqs_en_phase(&mut self, group: u32) -> bool {
        // Find a working VFIFO position, stepping the phase when none works.
        let mut steps = 0;
        'search: loop {
            for _ in 0..RTL_VFIFO_SIZE {
                if self.read_test(group, true, false).0 {
                    break 'search
                }
                self.phy(phy_mgr::CMD_INC_VFIFO_HR, group);
            }

            self.phase_up(group);
            steps += 1;
            if steps == MAX_PHASE_STEPS {
                warn!("group {}: no working VFIFO position", group);
                self.fail(group, Substage::DqsEnPhase);
                return false
            }
        }
        debug!("group {}: VFIFO found after {} phase steps", group, steps);

        // The current phase works; decrement until reads fail.
        let mut steps = 0;
        loop {
            self.phase_down(group);
            if !self.read_test(group, false, false).0 {
                break
            }
            steps += 1;
            if steps == MAX_PHASE_STEPS {
                warn!("group {}: no lower edge of the DQS enable window", group);
                self.fail(group, Substage::VfifoCenter);
                return false
            }
        }

        // Now increment across the window until reads fail again.
        let mut fail_to_fail_phase = 0;
        loop {
            self.phase_up(group);
            fail_to_fail_phase += 1;
            if !self.read_test(group, false, false).0 {
                break
            }
            if fail_to_fail_phase == MAX_PHASE_STEPS {
                warn!("group {}: no upper edge of the DQS enable window", group);
                self.fail(group, Substage::VfifoCenter);
                return false
            }
        }

        // Back off by half for the best margin.
        for _ in 0..fail_to_fail_phase / 2 {
            self.phase_down(group);
        }
        debug!("group {}: DQS enable window is {} phase steps wide", group, fail_to_fail_phase - 1);
        true
    }

    pub fn calibrate_vfifo(&mut self) -> bool {
        self.load_read_patterns();

        let mut pass = true;
        for &group in self.config.groups.groups() {
            // Every group is calibrated even after a failure.
            pass &= self.find_dqs_en_phase(group);
        }
        pass
    }

    /// Precharges all banks and activates row 0 in the first and last bank.
    pub fn precharge_and_activate(&mut self) {
        let rom = self.config.rom;
        self.run(rom.precharge_all);
        self.load(0, 0x0f, rom.activate_0_and_1_wait1);
        self.load(1, 0x0f, rom.activate_0_and_1_wait2);
        self.run(rom.activate_0_and_1);
    }

    pub fn mem_config(&mut self) {
        let t_wl = self.bus.read(self.config.layout.phy_mgr + phy_mgr::MEM_T_WL);
        let wlat = t_wl.saturating_sub(1) / 2 + 1;

        self.status.write_latency = wlat;
        self.phy(phy_mgr::AFI_WLAT, wlat - 1);

        self.precharge_and_activate();
    }

    pub fn mem_calibrate(&mut self) -> bool {
        self.status = Status::new();
        self.mem_config();
        self.calibrate_vfifo()
    }

    pub fn run_mem_calibrate(&mut self) -> Result<Status, Failure> {
        info!("calibrating {} memory", self.config.protocol);

        self.initialize();
        self.set_rank_and_odt_mask(0);
        self.mem_initialize();

        let pass = self.mem_calibrate();

        self.precharge_and_activate();
        self.phy(phy_mgr::CMD_FIFO_RESET, 0);
        self.mem_handoff();
        self.phy(phy_mgr::MUX_SEL, 0);

        if pass {
            self.phy(phy_mgr::CAL_STATUS, phy_mgr::CAL_SUCCESS);
            Ok(self.status)
        } else {
            self.phy(phy_mgr::CAL_STATUS, phy_mgr::CAL_FAIL);
            Err(Failure { status: self.status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{self, SimPhy};

    #[test]
    fn delay_counters() {
        assert_eq!(delay_loop_counters(0, 2), DelayLoop { inner: 0, outer: 0, c_loop: 0 });
        assert_eq!(delay_loop_counters(1, 2), DelayLoop { inner: 0, outer: 0, c_loop: 0 });
        assert_eq!(delay_loop_counters(250, 2), DelayLoop { inner: 124, outer: 0, c_loop: 0 });
        assert_eq!(delay_loop_counters(512, 2), DelayLoop { inner: 255, outer: 0, c_loop: 0 });
        assert_eq!(delay_loop_counters(514, 2), DelayLoop { inner: 0xff, outer: 1, c_loop: 0 });
        assert_eq!(delay_loop_counters(300_000, 2), DelayLoop { inner: 0xff, outer: 0xff, c_loop: 2 });
    }

    #[test]
    fn longest_delays_do_not_overflow() {
        assert_eq!(delay_loop_counters(u32::MAX, 2),
                   DelayLoop { inner: 0xff, outer: 0xff, c_loop: 0x7fff });
        let geometry = sim::config(Protocol::Ddr3).geometry;
        // 500 us at 150 MHz with a half-rate AFI
        assert_eq!(ns_to_mem_clocks(500_000, &geometry), 150_014);
        assert_eq!(ns_to_mem_clocks(u32::MAX, &Geometry { afi_rate_ratio: 8, ..geometry }),
                   u32::MAX);
    }

    #[test]
    fn short_delay_uses_single_loop() {
        let mut sequencer = Sequencer::new(SimPhy::new(10..=20), sim::config(Protocol::Ddr3));
        sequencer.delay_for_n_mem_clocks(250);
        assert_eq!(sequencer.bus().runs(), vec![sim::rom().idle_loop1]);
    }

    #[test]
    fn long_delay_repeats_nested_loop() {
        let mut sequencer = Sequencer::new(SimPhy::new(10..=20), sim::config(Protocol::Lpddr2));
        // 500 us is 75007 AFI clocks at 150 MHz
        sequencer.delay_for_n_ns(500_000);
        let idle_loop2 = sim::rom().idle_loop2;
        assert_eq!(sequencer.bus().runs(), vec![idle_loop2, idle_loop2]);
    }

    #[test]
    fn rank_mask() {
        let mut sequencer = Sequencer::new(SimPhy::new(10..=20), sim::config(Protocol::Ddr3));
        sequencer.set_rank_and_odt_mask(0);
        sequencer.set_rank_and_odt_mask(3);
        let masks: Vec<u32> = sequencer.bus().writes_to(sim::RW_MGR + rw_mgr::SET_CS_AND_ODT_MASK);
        assert_eq!(masks, vec![0xfe, 0xf7]);
    }

    #[test]
    fn read_test_reports_correct_bits() {
        let mut sequencer = Sequencer::new(SimPhy::new(0..=0), sim::config(Protocol::Ddr3));
        sequencer.bus().errors = Some(0x00);
        assert_eq!(sequencer.read_test(0, true, false), (true, 0xff));

        sequencer.bus().errors = Some(0x0f);
        assert_eq!(sequencer.read_test(0, true, false), (false, 0xf0));
        assert_eq!(sequencer.read_test(0, false, false), (true, 0xf0));

        sequencer.bus().errors = Some(0xff);
        assert_eq!(sequencer.read_test(0, false, false), (false, 0x00));
    }

    #[test]
    fn centers_in_read_window() {
        let mut sequencer = Sequencer::new(SimPhy::new(10..=20), sim::config(Protocol::Ddr3));
        sequencer.load_read_patterns();
        assert!(sequencer.find_dqs_en_phase(0));
        assert_eq!(sequencer.bus().phase(0), 15);
        assert_eq!(sequencer.bus().vfifo[0], sim::GOOD_VFIFO);
    }

    #[test]
    fn group_2_uses_capture_clock_1() {
        let mut sequencer = Sequencer::new(SimPhy::new(4..=8), sim::config(Protocol::Ddr3));
        assert!(sequencer.find_dqs_en_phase(2));
        assert_eq!(sequencer.bus().phase(1), 6);
        assert_eq!(sequencer.bus().phase(2), 0);
    }

    #[test]
    fn lpddr2_steps_both_clocks() {
        let mut sequencer = Sequencer::new(SimPhy::new(3..=7), sim::config(Protocol::Lpddr2));
        assert!(sequencer.find_dqs_en_phase(0));
        assert_eq!(sequencer.bus().phase(0), 5);
        assert_eq!(sequencer.bus().phase_at(sim::PLL_MGR + 4), 5);
    }

    #[test]
    fn successful_calibration() {
        let mut sequencer = Sequencer::new(SimPhy::new(10..=20), sim::config(Protocol::Ddr3));
        let status = sequencer.run_mem_calibrate().unwrap();
        assert_eq!(status.write_latency, 3);
        assert_eq!(status.error_stage, Stage::Nil);

        let phy = sequencer.bus();
        assert_eq!(phy.writes_to(sim::PHY_MGR + phy_mgr::AFI_WLAT), vec![2]);
        assert_eq!(phy.writes_to(sim::PHY_MGR + phy_mgr::MUX_SEL), vec![1, 0]);
        assert_eq!(phy.writes_to(sim::PHY_MGR + phy_mgr::CAL_STATUS), vec![0, phy_mgr::CAL_SUCCESS]);
        assert_eq!(phy.writes_to(sim::PHY_MGR + phy_mgr::RESET_MEM_STBL), vec![0, 1]);

        let runs = phy.runs();
        let rom = sim::rom();
        let tail = &runs[runs.len() - 7..];
        assert_eq!(tail, &[rom.precharge_all, rom.activate_0_and_1,
                           rom.precharge_all, rom.mrs2, rom.mrs3, rom.mrs1, rom.mrs0_user]);
    }

    #[test]
    fn failed_calibration() {
        let mut sequencer = Sequencer::new(SimPhy::without_window(), sim::config(Protocol::Ddr3));
        let failure = sequencer.run_mem_calibrate().unwrap_err();
        assert_eq!(failure.status.error_stage, Stage::Vfifo);
        assert_eq!(failure.status.error_substage, Substage::DqsEnPhase);
        assert_eq!(failure.status.error_group, 0);
        assert_eq!(sequencer.bus().writes_to(sim::PHY_MGR + phy_mgr::CAL_STATUS),
                   vec![0, phy_mgr::CAL_FAIL]);
        assert_eq!(sequencer.bus().phase(0), MAX_PHASE_STEPS as i32);
    }

    #[test]
    fn unbounded_window_fails_centering() {
        let mut sequencer = Sequencer::new(SimPhy::new(0..=i32::MAX), sim::config(Protocol::Ddr3));
        assert!(!sequencer.find_dqs_en_phase(0));
        assert_eq!(sequencer.status().error_substage, Substage::VfifoCenter);
    }

    #[test]
    fn failure_message() {
        let failure = Failure {
            status: Status {
                error_stage: Stage::Vfifo,
                error_substage: Substage::DqsEnPhase,
                error_group: 2,
                write_latency: 3,
            }
        };
        assert_eq!(failure.to_string(),
                   "calibration failed at stage Vfifo, substage DqsEnPhase, group 2");
    }
}
