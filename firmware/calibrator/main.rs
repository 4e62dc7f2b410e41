#![no_std]
#![no_main]

#[macro_use]
extern crate log;
#[macro_use]
extern crate board_xw;
extern crate sequencer;

use board_xw::panic;
use board_xw::uart_logger::ConsoleLogger;
use sequencer::{Mmio, Sequencer};

mod generated {
    #[allow(unused_imports)]
    use sequencer::{Config, Geometry, GroupLayout, InstRom, Layout, Protocol};
    #[allow(unused_imports)]
    use sequencer::config::DEFAULT_PLL_MGR;

    include!(concat!(env!("OUT_DIR"), "/sequencer_config.rs"));
}

#[cfg(feature = "phase_scan")]
fn print_phase_maps(sequencer: &mut Sequencer<Mmio>) {
    use core::fmt;
    use board_xw::uart_console::Console;
    use sequencer::regs::MAX_PHASE_STEPS;

    let mut console = Console;
    let mut logger: Option<&mut dyn fmt::Write> = Some(&mut console);
    for &group in generated::CONFIG.groups.groups() {
        sequencer::scan_dqs_en_phase(sequencer, group, MAX_PHASE_STEPS, &mut logger);
    }
}

#[no_mangle]
pub extern fn main() -> i32 {
    ConsoleLogger::register();
    println!("xw DDR3 calibration");

    let mut sequencer = Sequencer::new(Mmio, generated::CONFIG);
    sequencer.soft_reset();

    match sequencer.run_mem_calibrate() {
        Ok(status) => {
            info!("calibration passed, write latency {}", status.write_latency);
            #[cfg(feature = "phase_scan")]
            print_phase_maps(&mut sequencer);
        }
        Err(failure) => error!("{}", failure)
    }

    loop {}
}

#[panic_handler]
fn panic_fmt(info: &core::panic::PanicInfo) -> ! {
    panic::report(info)
}
