//! Test benches: clock a model, serve its program ROM and attach the DDR3
//! model to its Avalon-MM port.
//!
//! Every clock cycle dumps the trace twice, once after the rising edge and
//! once after the falling edge.

use byteorder::{ByteOrder, LittleEndian};

use super::{Error, Result};
use super::ddr3::{AvalonRequest, Ddr3Simulator};
use super::env::{Ddr3TestEnv, Model, XenowingEnv};

/// 64 KiB.
pub const PROGRAM_ROM_SIZE: usize = 0x10000;

pub struct ProgramRom {
    bytes: Vec<u8>,
}

impl ProgramRom {
    pub fn new(image: &[u8]) -> Result<ProgramRom> {
        if image.len() > PROGRAM_ROM_SIZE {
            return Err(Error::RomTooLarge { length: image.len(), capacity: PROGRAM_ROM_SIZE })
        }
        let mut bytes = vec![0; PROGRAM_ROM_SIZE];
        bytes[..image.len()].copy_from_slice(image);
        Ok(ProgramRom { bytes })
    }

    /// The little-endian word at word address `addr`. Addresses wrap
    /// around the ROM.
    pub fn word(&self, addr: u32) -> u32 {
        let offset = ((addr << 2) & 0xfffc) as usize;
        LittleEndian::read_u32(&self.bytes[offset..offset + 4])
    }
}

macro_rules! exchange_avalon {
    ($model:expr, $ddr3:expr, $cycle:expr) => {{
        let request = AvalonRequest {
            burstbegin: $model.avl_burstbegin(),
            addr: $model.avl_addr(),
            wdata: $model.avl_wdata(),
            be: $model.avl_be(),
            read_req: $model.avl_read_req(),
            write_req: $model.avl_write_req(),
            size: $model.avl_size(),
        };
        let cycle = $cycle;
        let response = $ddr3.eval(&request)
            .map_err(|violation| Error::Protocol { cycle, violation })?;
        $model.set_avl_ready(response.ready);
        $model.set_avl_rdata(response.rdata);
        $model.set_avl_rdata_valid(response.rdata_valid);
    }}
}

pub struct XenowingBench<'lib> {
    model: Model<'lib, XenowingEnv>,
    rom: ProgramRom,
    ddr3: Ddr3Simulator,
    rom_addr_next: u32,
    leds: u32,
    time: u64,
    cycles: u64,
}

impl<'lib> XenowingBench<'lib> {
    pub fn new(model: Model<'lib, XenowingEnv>, rom: ProgramRom,
               ddr3: Ddr3Simulator) -> XenowingBench<'lib> {
        XenowingBench {
            model,
            rom,
            ddr3,
            rom_addr_next: 0,
            leds: 0,
            time: 0,
            cycles: 0,
        }
    }

    fn dump(&mut self) {
        self.model.trace_dump(self.time);
        self.time += 1;
    }

    pub fn reset(&mut self) {
        self.model.set_reset_n(false);
        self.model.set_clk(false);
        self.model.set_program_rom_q(0);
        self.model.set_avl_ready(false);
        self.model.set_avl_rdata_valid(false);
        self.model.set_avl_rdata(0);
        self.model.eval();
        self.dump();

        self.model.set_clk(true);
        self.model.eval();
        self.dump();

        self.model.set_reset_n(true);
        self.model.set_clk(false);
        self.model.eval();
        self.dump();

        self.rom_addr_next = 0;
        self.leds = self.model.leds();
        debug!("reset done at time {}", self.time);
    }

    /// Runs one clock cycle, returning the new LED state if it changed.
    pub fn step(&mut self) -> Result<Option<u32>> {
        self.cycles += 1;

        self.model.set_clk(true);
        self.model.eval();

        // The ROM answers with one cycle of latency.
        let q = self.rom.word(self.rom_addr_next);
        self.model.set_program_rom_q(q);
        self.rom_addr_next = self.model.program_rom_addr();

        let leds = self.model.leds();
        let changed = if leds != self.leds {
            info!("LEDs changed: {:#010b} (cycle {})", leds, self.cycles);
            self.leds = leds;
            Some(leds)
        } else {
            None
        };

        exchange_avalon!(self.model, self.ddr3, self.cycles);
        self.model.eval();
        self.dump();

        self.model.set_clk(false);
        self.model.eval();
        self.dump();

        Ok(changed)
    }

    pub fn run(&mut self, cycles: u64) -> Result<()> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn leds(&self) -> u32 {
        self.leds
    }

    pub fn ddr3(&self) -> &Ddr3Simulator {
        &self.ddr3
    }

    pub fn finish(mut self) {
        self.model.finish();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ddr3Status {
    pub init_done: bool,
    pub cal_success: bool,
    pub cal_fail: bool,
    /// LEDs that are lit.
    pub leds: u32,
}

pub struct Ddr3TestBench<'lib> {
    model: Model<'lib, Ddr3TestEnv>,
    ddr3: Ddr3Simulator,
    leds: u32,
    time: u64,
    cycles: u64,
}

impl<'lib> Ddr3TestBench<'lib> {
    pub fn new(model: Model<'lib, Ddr3TestEnv>, ddr3: Ddr3Simulator) -> Ddr3TestBench<'lib> {
        Ddr3TestBench { model, ddr3, leds: 0, time: 0, cycles: 0 }
    }

    fn dump(&mut self) {
        self.model.trace_dump(self.time);
        self.time += 1;
    }

    fn lit_leds(&self) -> u32 {
        !self.model.leds_n() & 0xff
    }

    pub fn reset(&mut self) {
        self.model.set_reset_n(false);
        self.model.set_clk(false);
        self.model.set_avl_ready(false);
        self.model.set_avl_rdata_valid(false);
        self.model.set_avl_rdata(0);
        self.model.set_ddr3_init_done(false);
        self.model.set_ddr3_cal_success(false);
        self.model.set_ddr3_cal_fail(false);
        self.model.eval();
        self.dump();

        self.model.set_clk(true);
        self.model.eval();
        self.dump();

        self.model.set_reset_n(true);
        self.model.set_clk(false);
        self.model.eval();
        self.dump();

        self.leds = self.lit_leds();
    }

    pub fn step(&mut self) -> Result<Option<u32>> {
        self.cycles += 1;

        self.model.set_clk(true);
        self.model.eval();

        exchange_avalon!(self.model, self.ddr3, self.cycles);
        let init_done = self.ddr3.init_done();
        if init_done && !self.model.ddr3_init_done() {
            info!("DDR3 initialized (cycle {})", self.cycles);
        }
        self.model.set_ddr3_init_done(init_done);
        self.model.set_ddr3_cal_success(self.ddr3.cal_success());
        self.model.set_ddr3_cal_fail(self.ddr3.cal_fail());
        self.model.eval();
        self.dump();

        self.model.set_clk(false);
        self.model.eval();
        self.dump();

        let leds = self.lit_leds();
        if leds != self.leds {
            info!("LEDs changed: {:#010b} (cycle {})", leds, self.cycles);
            self.leds = leds;
            return Ok(Some(leds))
        }
        Ok(None)
    }

    pub fn run(&mut self, cycles: u64) -> Result<()> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    pub fn status(&self) -> Ddr3Status {
        Ddr3Status {
            init_done: self.model.ddr3_init_done(),
            cal_success: self.model.ddr3_cal_success(),
            cal_fail: self.model.ddr3_cal_fail(),
            leds: self.leds,
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn finish(mut self) {
        self.model.finish();
    }
}
