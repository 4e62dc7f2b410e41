//! Drives cycle-accurate simulation models of the xw hardware.
//!
//! A model is a shared library built from the RTL. It exports a table of
//! port getters and setters (`env`); the benches in `bench` clock it,
//! answer its program ROM reads and attach the DDR3 memory model in `ddr3`.

use std::path::PathBuf;

use thiserror::Error;

pub mod env;
pub mod ddr3;
pub mod bench;
#[cfg(test)]
mod fake;

pub use self::env::{Model, ModelLibrary, ModelEnv, XenowingEnv, Ddr3TestEnv};
pub use self::ddr3::{Ddr3Simulator, AvalonRequest, AvalonResponse, Violation};
pub use self::bench::{ProgramRom, XenowingBench, Ddr3TestBench, Ddr3Status};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot load simulation model {path}: {source}")]
    Load { path: PathBuf, source: libloading::Error },
    #[error("simulation model does not export {symbol}: {source}")]
    Symbol { symbol: &'static str, source: libloading::Error },
    #[error("simulation model returned no port table")]
    NullEnv,
    #[error("simulation model implements {found}, expected {expected}")]
    WrongTop { expected: &'static str, found: String },
    #[error("cannot open trace {path}")]
    Trace { path: PathBuf },
    #[error("program ROM image is {length} bytes, the ROM holds {capacity}")]
    RomTooLarge { length: usize, capacity: usize },
    #[error("DDR3 protocol violation at cycle {cycle}: {violation}")]
    Protocol { cycle: u64, violation: Violation },
}

pub type Result<T> = std::result::Result<T, Error>;
