#[macro_use]
extern crate log;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use clap::{Args, Parser, Subcommand};

use proto_xw::monitor_proto::TILE_PIXELS;
use xw_host::console::{ProgramSource, Session};
use xw_host::device;
use xw_host::monitor::{Client, Tile};
use xw_host::parse_u32;
use xw_host::serial::{SerialDevice, DEFAULT_BAUD_RATE};
use xw_host::sim::{Ddr3Simulator, Ddr3TestBench, Ddr3TestEnv, ModelLibrary, ProgramRom,
                   XenowingBench, XenowingEnv};

#[derive(Parser)]
#[command(name = "xw", about = "Host tools for the xw computer")]
struct Cli {
    #[command(flatten)]
    connection: Connection,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    /// Serial port the board is attached to
    #[arg(long, env = "XW_PORT", global = true)]
    port: Option<String>,
    #[arg(long, env = "XW_BAUD", default_value_t = DEFAULT_BAUD_RATE, global = true)]
    baud: u32,
}

impl Connection {
    fn open(&self) -> Result<SerialDevice> {
        let port = match self.port {
            Some(ref port) => port,
            None => bail!("no serial port given (use --port or XW_PORT)")
        };
        SerialDevice::open(port, self.baud)
            .with_context(|| format!("cannot open {}", port))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Answer every program request with IMAGE, then show the console
    Boot {
        image: PathBuf,
    },
    /// Show the console, serving requested programs from a directory
    Console {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Read a word through the monitor
    Peek {
        #[arg(value_parser = parse_u32)]
        addr: u32,
    },
    /// Write a word through the monitor
    Poke {
        #[arg(value_parser = parse_u32)]
        addr: u32,
        #[arg(value_parser = parse_u32)]
        value: u32,
    },
    /// Load the rasterizer tile buffer from a file of little-endian pixels
    TileWrite {
        file: PathBuf,
    },
    /// Save the rasterizer tile buffer to a file of little-endian pixels
    TileRead {
        file: PathBuf,
    },
    /// Run the rasterizer and print the cycles it took
    Rasterize,
    /// Run the xenowing model with a program ROM image
    Sim {
        model: PathBuf,
        #[arg(long)]
        rom: PathBuf,
        #[arg(long, default_value_t = 2_800_000)]
        cycles: u64,
        /// Write a VCD trace (default trace.vcd)
        #[arg(long, value_name = "VCD", num_args = 0..=1,
              default_missing_value = "trace.vcd")]
        trace: Option<PathBuf>,
    },
    /// Run the DDR3 test model and report calibration
    SimDdr3 {
        model: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        cycles: u64,
        #[arg(long, value_name = "VCD", num_args = 0..=1,
              default_missing_value = "trace.vcd")]
        trace: Option<PathBuf>,
    },
}

fn serve_console(connection: &Connection, source: ProgramSource) -> Result<()> {
    let mut device = connection.open()?;
    let mut session = Session::new(source, io::stdout());
    session.run(&mut device)?;
    info!("monitor ready after {} program(s)", session.programs_served());
    Ok(())
}

fn with_monitor<T, F>(connection: &Connection, f: F) -> Result<T>
    where F: FnOnce(&mut Client<SerialDevice>) -> device::Result<T>
{
    let mut device = connection.open()?;
    let mut client = Client::new(&mut device);
    info!("waiting for the monitor");
    client.wait_ready(&mut io::stdout())
        .context("monitor did not announce a frame")?;
    let value = f(&mut client)?;
    client.end_frame()?;
    Ok(value)
}

fn read_tile(path: &PathBuf) -> Result<Tile> {
    let bytes = fs::read(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if bytes.len() != TILE_PIXELS * 4 {
        bail!("{} is {} bytes, a tile is {} bytes", path.display(), bytes.len(), TILE_PIXELS * 4)
    }
    let mut pixels = [0; TILE_PIXELS];
    LittleEndian::read_u32_into(&bytes, &mut pixels);
    Ok(pixels)
}

fn write_tile(path: &PathBuf, pixels: &Tile) -> Result<()> {
    let mut bytes = vec![0; TILE_PIXELS * 4];
    LittleEndian::write_u32_into(pixels, &mut bytes);
    fs::write(path, bytes)
        .with_context(|| format!("cannot write {}", path.display()))
}

fn open_model(path: &PathBuf, trace: Option<PathBuf>) -> Result<ModelLibrary> {
    let library = ModelLibrary::open(path)?;
    if let Some(trace) = trace {
        library.open_trace(&trace)?;
    }
    Ok(library)
}

fn simulate(model: PathBuf, rom: PathBuf, cycles: u64, trace: Option<PathBuf>) -> Result<()> {
    let image = fs::read(&rom)
        .with_context(|| format!("cannot read ROM image {}", rom.display()))?;
    let library = open_model(&model, trace)?;
    let mut bench = XenowingBench::new(library.model::<XenowingEnv>()?,
                                       ProgramRom::new(&image)?,
                                       Ddr3Simulator::default());
    bench.reset();

    let start = Instant::now();
    bench.run(cycles)?;
    info!("simulated {} cycles in {:.2?}, LEDs {:#010b}",
          bench.cycles(), start.elapsed(), bench.leds());
    bench.finish();
    Ok(())
}

fn simulate_ddr3(model: PathBuf, cycles: u64, trace: Option<PathBuf>) -> Result<()> {
    let library = open_model(&model, trace)?;
    let mut bench = Ddr3TestBench::new(library.model::<Ddr3TestEnv>()?,
                                       Ddr3Simulator::default());
    bench.reset();
    bench.run(cycles)?;

    let status = bench.status();
    bench.finish();
    info!("after {} cycles: init done {}, calibration success {}, failure {}, LEDs {:#010b}",
          cycles, status.init_done, status.cal_success, status.cal_fail, status.leds);
    if status.cal_fail {
        bail!("DDR3 calibration failed")
    }
    if !status.cal_success {
        warn!("DDR3 calibration did not finish");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { connection, command } = Cli::parse();
    match command {
        Command::Boot { image } =>
            serve_console(&connection, ProgramSource::Fixed(image)),
        Command::Console { root } =>
            serve_console(&connection, ProgramSource::Directory(root)),
        Command::Peek { addr } => {
            let value = with_monitor(&connection, |client| client.read_word(addr))?;
            println!("{:#010x}: {:#010x}", addr, value);
            Ok(())
        }
        Command::Poke { addr, value } =>
            with_monitor(&connection, |client| client.write_word(addr, value)),
        Command::TileWrite { file } => {
            let pixels = read_tile(&file)?;
            with_monitor(&connection, |client| client.write_tile(&pixels))
        }
        Command::TileRead { file } => {
            let pixels = with_monitor(&connection, |client| client.read_tile())?;
            write_tile(&file, &pixels)
        }
        Command::Rasterize => {
            let cycles = with_monitor(&connection, |client| client.rasterize())?;
            println!("rasterized in {} cycles", cycles);
            Ok(())
        }
        Command::Sim { model, rom, cycles, trace } =>
            simulate(model, rom, cycles, trace),
        Command::SimDdr3 { model, cycles, trace } =>
            simulate_ddr3(model, cycles, trace),
    }
}
