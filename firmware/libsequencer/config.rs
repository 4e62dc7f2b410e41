use core::fmt;

/// Base addresses of the managers on the sequencer bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub phy_mgr: u32,
    pub rw_mgr: u32,
    pub pll_mgr: u32,
}

pub const DEFAULT_PLL_MGR: u32 = 0x0005_8000;

/// Entry points of the read/write manager instruction ROM. These are
/// generated together with the ROM image; entries that the configured
/// memory protocol does not use may be left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstRom {
    pub idle_loop1: u32,
    pub idle_loop2: u32,

    pub init_reset_0_cke_0: u32,
    pub init_reset_0_cke_0_inloop: u32,
    pub init_reset_1_cke_0: u32,
    pub init_reset_1_cke_0_inloop_1: u32,
    pub init_cke_0: u32,
    pub init_cke_0_inloop: u32,
    pub nop: u32,
    pub zqcl: u32,
    pub refresh: u32,
    pub precharge_all: u32,

    // DDR3 mode registers
    pub mrs0_dll_reset: u32,
    pub mrs0_user: u32,
    pub mrs1: u32,
    pub mrs2: u32,
    pub mrs3: u32,

    // DDR2 mode registers
    pub emr: u32,
    pub emr2: u32,
    pub emr3: u32,
    pub emr_ocd_enable: u32,
    pub mr_dll_reset: u32,
    pub mr_calib: u32,
    pub mr_user: u32,

    // LPDDR2 mode registers
    pub mr63_reset: u32,
    pub mr10_zqc: u32,
    pub mr1_calib: u32,
    pub mr1_user: u32,
    pub mr2: u32,
    pub mr3: u32,

    pub guaranteed_write: u32,
    pub guaranteed_write_wait: [u32; 4],
    pub read_b2b: u32,
    pub read_b2b_wait1: u32,
    pub read_b2b_wait2: u32,
    pub clear_dqs_enable: u32,
    pub activate_0_and_1: u32,
    pub activate_0_and_1_wait1: u32,
    pub activate_0_and_1_wait2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub dq_per_read_dqs: u32,
    pub dq_per_write_dqs: u32,
    pub virtual_groups_per_read_dqs: u32,
    pub data_width: u32,
    pub data_mask_width: u32,
    pub read_dqs_width: u32,
    pub afi_rate_ratio: u32,
    /// MHz
    pub afi_clk_freq: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ddr2,
    Ddr3,
    Lpddr2,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Protocol::Ddr2 => write!(f, "DDR2"),
            &Protocol::Ddr3 => write!(f, "DDR3"),
            &Protocol::Lpddr2 => write!(f, "LPDDR2"),
        }
    }
}

/// How the DQ bus is split into capture groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLayout {
    X8,
    X16 { two_capture_clocks: bool },
    X24,
}

impl GroupLayout {
    /// The groups whose DQS enable phase is calibrated.
    pub fn groups(&self) -> &'static [u32] {
        match *self {
            GroupLayout::X8 => &[0],
            GroupLayout::X16 { two_capture_clocks: true } => &[0, 1],
            GroupLayout::X16 { two_capture_clocks: false } => &[0],
            GroupLayout::X24 => &[0, 2],
        }
    }
}

fn low_bits(count: u32) -> u32 {
    if count >= 32 { !0 } else { (1 << count) - 1 }
}

/// Bit masks of a fully correct read or write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Params {
    pub read_correct_mask_vg: u32,
    pub write_correct_mask_vg: u32,
    pub read_correct_mask: u32,
    pub write_correct_mask: u32,
    pub dm_correct_mask: u32,
}

impl Params {
    pub fn new(geometry: &Geometry) -> Params {
        let per_vg = geometry.dq_per_read_dqs / geometry.virtual_groups_per_read_dqs;
        Params {
            read_correct_mask_vg: low_bits(per_vg),
            write_correct_mask_vg: low_bits(per_vg),
            read_correct_mask: low_bits(geometry.dq_per_read_dqs),
            write_correct_mask: low_bits(geometry.dq_per_write_dqs),
            dm_correct_mask: low_bits(geometry.data_width / geometry.data_mask_width),
        }
    }
}
