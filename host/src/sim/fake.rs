//! An in-process stand-in for a model library, with its state kept per
//! thread so tests stay independent.

use std::cell::RefCell;

use super::env::{Ddr3TestEnv, XenowingEnv};

/// Scripted traffic on the Avalon-MM master port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Master {
    Idle,
    /// Write `data` to `addr`, then read it back.
    Write { addr: u32, data: u64 },
    Read,
    WaitData,
    /// Request a read and a write in the same cycle.
    Conflict,
}

impl Default for Master {
    fn default() -> Master { Master::Idle }
}

#[derive(Debug, Default)]
pub struct Ports {
    pub reset_n: u32,
    pub clk: u32,
    pub program_rom_addr: u32,
    pub program_rom_q: u32,
    pub leds: u32,
    pub avl_ready: u32,
    pub avl_burstbegin: u32,
    pub avl_addr: u32,
    pub avl_rdata_valid: u32,
    pub avl_rdata: u64,
    pub avl_wdata: u64,
    pub avl_be: u32,
    pub avl_read_req: u32,
    pub avl_write_req: u32,
    pub avl_size: u32,
    pub ddr3_init_done: u32,
    pub ddr3_cal_success: u32,
    pub ddr3_cal_fail: u32,
    pub leds_n: u32,

    last_clk: u32,
    fetches: u32,
    pub master: Master,
    pub read_back: Option<u64>,
    pub dumps: Vec<u64>,
    pub finished: bool,
}

impl Ports {
    /// On each rising clock edge out of reset the "CPU" shows the last ROM
    /// word on its LEDs and fetches the next word address in sequence.
    fn eval(&mut self) {
        self.leds_n = if self.ddr3_cal_success != 0 { 0xfe } else { 0xff };

        let rising = self.clk != 0 && self.last_clk == 0;
        self.last_clk = self.clk;
        if !rising || self.reset_n == 0 {
            return
        }

        self.leds = self.program_rom_q;
        self.program_rom_addr = self.fetches;
        self.fetches += 1;
        self.drive_master();
    }

    fn request(&mut self, write: bool, addr: u32) {
        self.avl_burstbegin = 1;
        self.avl_addr = addr;
        self.avl_be = 0xff;
        self.avl_size = 1;
        self.avl_write_req = write as u32;
        self.avl_read_req = !write as u32;
    }

    fn release(&mut self) {
        self.avl_burstbegin = 0;
        self.avl_read_req = 0;
        self.avl_write_req = 0;
    }

    fn drive_master(&mut self) {
        match self.master {
            Master::Idle => (),
            Master::Conflict => {
                self.avl_read_req = 1;
                self.avl_write_req = 1;
            }
            Master::Write { addr, data } => {
                if self.avl_write_req != 0 && self.avl_ready != 0 {
                    self.release();
                    self.request(false, addr);
                    self.master = Master::Read;
                } else {
                    self.request(true, addr);
                    self.avl_wdata = data;
                }
            }
            Master::Read => {
                if self.avl_ready != 0 {
                    self.release();
                    self.master = Master::WaitData;
                }
            }
            Master::WaitData => {
                if self.avl_rdata_valid != 0 {
                    self.read_back = Some(self.avl_rdata);
                    self.master = Master::Idle;
                }
            }
        }
    }
}

thread_local!(static PORTS: RefCell<Ports> = RefCell::new(Ports::default()));

pub fn with<T, F: FnOnce(&mut Ports) -> T>(f: F) -> T {
    PORTS.with(|ports| f(&mut ports.borrow_mut()))
}

pub fn reset() {
    with(|ports| *ports = Ports::default())
}

macro_rules! fake_ports {
    ($( $field:ident: $raw:ty => $get:ident, $set:ident; )*) => {
        $(
            extern "C" fn $get() -> $raw { with(|ports| ports.$field) }
            extern "C" fn $set(value: $raw) { with(|ports| ports.$field = value) }
        )*
    }
}

fake_ports! {
    reset_n: u32 => get_reset_n, set_reset_n;
    clk: u32 => get_clk, set_clk;
    program_rom_addr: u32 => get_program_rom_addr, set_program_rom_addr;
    program_rom_q: u32 => get_program_rom_q, set_program_rom_q;
    leds: u32 => get_leds, set_leds;
    avl_ready: u32 => get_avl_ready, set_avl_ready;
    avl_burstbegin: u32 => get_avl_burstbegin, set_avl_burstbegin;
    avl_addr: u32 => get_avl_addr, set_avl_addr;
    avl_rdata_valid: u32 => get_avl_rdata_valid, set_avl_rdata_valid;
    avl_rdata: u64 => get_avl_rdata, set_avl_rdata;
    avl_wdata: u64 => get_avl_wdata, set_avl_wdata;
    avl_be: u32 => get_avl_be, set_avl_be;
    avl_read_req: u32 => get_avl_read_req, set_avl_read_req;
    avl_write_req: u32 => get_avl_write_req, set_avl_write_req;
    avl_size: u32 => get_avl_size, set_avl_size;
    ddr3_init_done: u32 => get_ddr3_init_done, set_ddr3_init_done;
    ddr3_cal_success: u32 => get_ddr3_cal_success, set_ddr3_cal_success;
    ddr3_cal_fail: u32 => get_ddr3_cal_fail, set_ddr3_cal_fail;
    leds_n: u32 => get_leds_n, set_leds_n;
}

extern "C" fn eval() {
    with(|ports| ports.eval())
}

extern "C" fn final_() {
    with(|ports| ports.finished = true)
}

extern "C" fn trace_dump(time: u64) {
    with(|ports| ports.dumps.push(time))
}

pub static XENOWING: XenowingEnv = XenowingEnv {
    get_reset_n, set_reset_n,
    get_clk, set_clk,
    get_program_rom_addr, set_program_rom_addr,
    get_program_rom_q, set_program_rom_q,
    get_leds, set_leds,
    get_avl_ready, set_avl_ready,
    get_avl_burstbegin, set_avl_burstbegin,
    get_avl_addr, set_avl_addr,
    get_avl_rdata_valid, set_avl_rdata_valid,
    get_avl_rdata, set_avl_rdata,
    get_avl_wdata, set_avl_wdata,
    get_avl_be, set_avl_be,
    get_avl_read_req, set_avl_read_req,
    get_avl_write_req, set_avl_write_req,
    get_avl_size, set_avl_size,
    eval, final_, trace_dump,
};

pub static DDR3_TEST: Ddr3TestEnv = Ddr3TestEnv {
    get_reset_n, set_reset_n,
    get_clk, set_clk,
    get_avl_ready, set_avl_ready,
    get_avl_burstbegin, set_avl_burstbegin,
    get_avl_addr, set_avl_addr,
    get_avl_rdata_valid, set_avl_rdata_valid,
    get_avl_rdata, set_avl_rdata,
    get_avl_wdata, set_avl_wdata,
    get_avl_be, set_avl_be,
    get_avl_read_req, set_avl_read_req,
    get_avl_write_req, set_avl_write_req,
    get_avl_size, set_avl_size,
    get_ddr3_init_done, set_ddr3_init_done,
    get_ddr3_cal_success, set_ddr3_cal_success,
    get_ddr3_cal_fail, set_ddr3_cal_fail,
    get_leds_n, set_leds_n,
    eval, final_, trace_dump,
};
