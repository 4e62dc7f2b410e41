use core::fmt::Write;
use log::{Log, LevelFilter, Metadata, Record};

use crate::clock;
use crate::uart_console::Console;

pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    #[cfg(target_has_atomic = "ptr")]
    pub fn register() {
        // A second registration keeps the first logger.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    }

    // rv32i has no atomics; the images are single-threaded and register
    // once at start-up before anything logs.
    #[cfg(not(target_has_atomic = "ptr"))]
    pub fn register() {
        unsafe {
            let _ = log::set_logger_racy(&LOGGER);
            log::set_max_level_racy(LevelFilter::Trace);
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = clock::get_us();
            let seconds   = timestamp / 1_000_000;
            let micros    = timestamp % 1_000_000;

            let _ = writeln!(Console, "[{:6}.{:06}s] {:>5}({}): {}",
                             seconds, micros, record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
    }
}
