//! Behavioural model of the DDR3 controller's Avalon-MM slave port.
//!
//! The model does not track DRAM timing. It needs `INIT_CYCLES` cycles to
//! come out of initialization, queues up to `COMMAND_FIFO_DEPTH` commands,
//! completes each one `COMMAND_LATENCY` cycles after starting it and
//! inserts a refresh every `REFRESH_INTERVAL` cycles. Memory is organized in
//! 64-bit words with one byte enable bit per byte.

use std::collections::VecDeque;
use std::fmt;

pub const INIT_CYCLES: u32 = 100;
pub const COMMAND_FIFO_DEPTH: usize = 10;
pub const COMMAND_LATENCY: u32 = 2;
pub const REFRESH_INTERVAL: u32 = 200;
/// 128 MiB.
pub const DEFAULT_WORDS: usize = 0x100_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    ReadAndWrite,
    BurstWithoutRequest,
    BurstSize(u32),
    AddressOutOfRange(u32),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Violation::ReadAndWrite =>
                write!(f, "read and write requested in the same cycle"),
            &Violation::BurstWithoutRequest =>
                write!(f, "burstbegin asserted without a read or write request"),
            &Violation::BurstSize(size) =>
                write!(f, "burst of size {} requested, only single beats are supported", size),
            &Violation::AddressOutOfRange(addr) =>
                write!(f, "word address {:#x} is outside the memory", addr),
        }
    }
}

/// Signals driven by the Avalon master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvalonRequest {
    pub burstbegin: bool,
    pub addr: u32,
    pub wdata: u64,
    pub be: u32,
    pub read_req: bool,
    pub write_req: bool,
    pub size: u32,
}

/// Signals driven by the memory controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvalonResponse {
    pub ready: bool,
    pub rdata: u64,
    pub rdata_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Read { addr: u32, byte_enable: u32 },
    Write { addr: u32, byte_enable: u32, data: u64 },
    Refresh,
}

fn byte_mask(byte_enable: u32) -> u64 {
    (0..8).filter(|i| byte_enable & (1 << i) != 0)
          .fold(0, |mask, i| mask | (0xff << (i * 8)))
}

pub struct Ddr3Simulator {
    memory: Vec<u64>,
    commands: VecDeque<Command>,
    /// The command in flight and the cycles it has been running.
    current: Option<(Command, u32)>,
    cycles_since_refresh: u32,
    init_cycles: u32,
    response: AvalonResponse,
}

impl Default for Ddr3Simulator {
    fn default() -> Ddr3Simulator {
        Ddr3Simulator::new(DEFAULT_WORDS)
    }
}

impl Ddr3Simulator {
    pub fn new(words: usize) -> Ddr3Simulator {
        Ddr3Simulator {
            memory: vec![0; words],
            commands: VecDeque::with_capacity(COMMAND_FIFO_DEPTH),
            current: None,
            cycles_since_refresh: 0,
            init_cycles: 0,
            response: AvalonResponse::default(),
        }
    }

    pub fn init_done(&self) -> bool {
        self.init_cycles >= INIT_CYCLES
    }

    /// The model has no calibration to fail; it is calibrated once it is
    /// initialized.
    pub fn cal_success(&self) -> bool {
        self.init_done()
    }

    pub fn cal_fail(&self) -> bool {
        false
    }

    pub fn response(&self) -> AvalonResponse {
        self.response
    }

    pub fn memory(&self) -> &[u64] {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut [u64] {
        &mut self.memory
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Read { addr, byte_enable } => {
                let mask = byte_mask(byte_enable);
                let word = self.memory[addr as usize];
                self.response.rdata = (self.response.rdata & !mask) | (word & mask);
                self.response.rdata_valid = true;
            }
            Command::Write { addr, byte_enable, data } => {
                let mask = byte_mask(byte_enable);
                let word = &mut self.memory[addr as usize];
                *word = (*word & !mask) | (data & mask);
            }
            Command::Refresh => ()
        }
    }

    fn accept(&self, request: &AvalonRequest) -> Result<Option<Command>, Violation> {
        if request.read_req && request.write_req {
            return Err(Violation::ReadAndWrite)
        }
        if request.burstbegin {
            if !request.read_req && !request.write_req {
                return Err(Violation::BurstWithoutRequest)
            }
            if request.size != 1 {
                return Err(Violation::BurstSize(request.size))
            }
        }
        if (request.read_req || request.write_req) &&
                request.addr as usize >= self.memory.len() {
            return Err(Violation::AddressOutOfRange(request.addr))
        }

        Ok(if request.read_req {
            Some(Command::Read { addr: request.addr, byte_enable: request.be })
        } else if request.write_req {
            Some(Command::Write { addr: request.addr, byte_enable: request.be, data: request.wdata })
        } else {
            None
        })
    }

    /// Advances the model by one clock cycle.
    pub fn eval(&mut self, request: &AvalonRequest) -> Result<AvalonResponse, Violation> {
        if !self.init_done() {
            self.init_cycles += 1;
            return Ok(self.response)
        }

        self.response.rdata_valid = false;
        self.cycles_since_refresh += 1;

        match self.current.take() {
            Some((command, elapsed)) => {
                if elapsed + 1 >= COMMAND_LATENCY {
                    self.execute(command)
                } else {
                    self.current = Some((command, elapsed + 1))
                }
            }
            None => {
                if self.cycles_since_refresh >= REFRESH_INTERVAL {
                    self.current = Some((Command::Refresh, 0));
                    self.cycles_since_refresh = 0;
                } else if let Some(command) = self.commands.pop_front() {
                    self.current = Some((command, 0));
                }
            }
        }

        let command = self.accept(request)?;
        self.response.ready = self.commands.len() < COMMAND_FIFO_DEPTH;
        if self.response.ready {
            if let Some(command) = command {
                self.commands.push_back(command)
            }
        }
        Ok(self.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized(words: usize) -> Ddr3Simulator {
        let mut ddr3 = Ddr3Simulator::new(words);
        for _ in 0..INIT_CYCLES {
            let response = ddr3.eval(&AvalonRequest::default()).unwrap();
            assert!(!response.ready);
        }
        assert!(ddr3.init_done() && ddr3.cal_success() && !ddr3.cal_fail());
        ddr3
    }

    fn write(addr: u32, data: u64, be: u32) -> AvalonRequest {
        AvalonRequest { burstbegin: true, addr, wdata: data, be, write_req: true, size: 1,
                        ..AvalonRequest::default() }
    }

    fn read(addr: u32, be: u32) -> AvalonRequest {
        AvalonRequest { burstbegin: true, addr, be, read_req: true, size: 1,
                        ..AvalonRequest::default() }
    }

    /// Clocks an idle bus until read data shows up, returning it and the
    /// number of cycles waited.
    fn wait_rdata(ddr3: &mut Ddr3Simulator) -> (u64, u32) {
        for cycle in 1..100 {
            let response = ddr3.eval(&AvalonRequest::default()).unwrap();
            if response.rdata_valid {
                return (response.rdata, cycle)
            }
        }
        panic!("no read data")
    }

    #[test]
    fn ignores_requests_during_init() {
        let mut ddr3 = Ddr3Simulator::new(16);
        let response = ddr3.eval(&write(0, 0xff, 0xff)).unwrap();
        assert!(!response.ready);
        for _ in 0..INIT_CYCLES + 10 {
            ddr3.eval(&AvalonRequest::default()).unwrap();
        }
        assert_eq!(ddr3.memory()[0], 0);
    }

    #[test]
    fn writes_then_reads_back() {
        let mut ddr3 = initialized(16);
        assert!(ddr3.eval(&write(3, 0x1122_3344_5566_7788, 0xff)).unwrap().ready);
        assert!(ddr3.eval(&read(3, 0xff)).unwrap().ready);
        let (rdata, _) = wait_rdata(&mut ddr3);
        assert_eq!(rdata, 0x1122_3344_5566_7788);
        assert_eq!(ddr3.memory()[3], 0x1122_3344_5566_7788);
    }

    #[test]
    fn read_completes_after_command_latency() {
        let mut ddr3 = initialized(16);
        ddr3.eval(&read(0, 0xff)).unwrap();
        // One cycle to start the command, then the latency.
        let (_, cycles) = wait_rdata(&mut ddr3);
        assert_eq!(cycles, 1 + COMMAND_LATENCY);
    }

    #[test]
    fn byte_enables_merge() {
        let mut ddr3 = initialized(16);
        ddr3.memory_mut()[1] = 0xaaaa_aaaa_aaaa_aaaa;
        ddr3.eval(&write(1, 0x1111_2222_3333_4444, 0x0f)).unwrap();
        for _ in 0..4 {
            ddr3.eval(&AvalonRequest::default()).unwrap();
        }
        assert_eq!(ddr3.memory()[1], 0xaaaa_aaaa_3333_4444);

        ddr3.memory_mut()[2] = 0x0102_0304_0506_0708;
        ddr3.eval(&read(1, 0xff)).unwrap();
        wait_rdata(&mut ddr3);
        // Bytes not enabled keep the previous read data.
        ddr3.eval(&read(2, 0xf0)).unwrap();
        let (rdata, _) = wait_rdata(&mut ddr3);
        assert_eq!(rdata, 0x0102_0304_3333_4444);
    }

    #[test]
    fn fifo_applies_backpressure() {
        let mut ddr3 = initialized(64);
        let mut accepted = 0;
        for addr in 0..20 {
            if ddr3.eval(&write(addr, addr as u64, 0xff)).unwrap().ready {
                accepted += 1;
            }
        }
        // The controller drains one command per latency period while the
        // master floods it, so the FIFO fills up.
        assert!(accepted < 20);
        assert!(ddr3.commands.len() == COMMAND_FIFO_DEPTH);
    }

    #[test]
    fn refreshes_periodically() {
        let mut ddr3 = initialized(16);
        for _ in 0..REFRESH_INTERVAL - 1 {
            ddr3.eval(&AvalonRequest::default()).unwrap();
        }
        ddr3.eval(&read(0, 0xff)).unwrap();
        assert_eq!(ddr3.current, Some((Command::Refresh, 0)));
        let (_, cycles) = wait_rdata(&mut ddr3);
        assert!(cycles > 1 + COMMAND_LATENCY);
    }

    #[test]
    fn protocol_violations() {
        let mut ddr3 = initialized(16);
        let both = AvalonRequest { read_req: true, write_req: true, ..AvalonRequest::default() };
        assert_eq!(ddr3.eval(&both), Err(Violation::ReadAndWrite));

        let burst = AvalonRequest { burstbegin: true, size: 1, ..AvalonRequest::default() };
        assert_eq!(ddr3.eval(&burst), Err(Violation::BurstWithoutRequest));

        let long = AvalonRequest { size: 4, ..read(0, 0xff) };
        assert_eq!(ddr3.eval(&long), Err(Violation::BurstSize(4)));

        assert_eq!(ddr3.eval(&read(16, 0xff)), Err(Violation::AddressOutOfRange(16)));
    }
}
