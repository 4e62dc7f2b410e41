//! Manager register offsets.

pub mod rw_mgr {
    pub const RUN_SINGLE_GROUP: u32 = 0x0000;
    pub const RUN_ALL_GROUPS: u32 = 0x0400;
    pub const LOAD_CNTR: [u32; 4] = [0x0800, 0x0804, 0x0808, 0x080c];
    pub const LOAD_JUMP_ADD: [u32; 4] = [0x0c00, 0x0c04, 0x0c08, 0x0c0c];
    pub const RESET_READ_DATAPATH: u32 = 0x1000;
    pub const SET_CS_AND_ODT_MASK: u32 = 0x1400;
    pub const SOFT_RESET: u32 = 0x2000;

    pub const RANK_ALL: u32 = 0x00;
}

pub mod phy_mgr {
    pub const CMD_INC_VFIFO_HR: u32 = 0x0004;
    pub const CMD_FIFO_RESET: u32 = 0x0008;
    pub const MEM_T_WL: u32 = 0x001c;

    pub const PHY_RLAT: u32 = 0x4000;
    pub const RESET_MEM_STBL: u32 = 0x4004;
    pub const MUX_SEL: u32 = 0x4008;
    pub const CAL_STATUS: u32 = 0x400c;
    pub const AFI_WLAT: u32 = 0x4018;

    pub const CAL_SUCCESS: u32 = 1;
    pub const CAL_FAIL: u32 = 2;
}

pub mod pll_mgr {
    pub const INCR: u32 = 1;
    pub const DECR: u32 = 0;
}

/// Depth of the read-valid FIFO.
pub const RTL_VFIFO_SIZE: u32 = 8;

/// PLL phase steps tried before a sweep gives up; 600 steps of 10 ps span
/// one memory clock at 167 MHz.
pub const MAX_PHASE_STEPS: u32 = 600;
