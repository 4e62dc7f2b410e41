//! Port tables exported by simulation models.
//!
//! A model library exports three C symbols:
//!
//! * `xw_model_top`: returns the NUL-terminated name of the top-level module,
//! * `xw_model_env`: returns a pointer to the module's port table,
//! * `xw_model_trace` (optional): opens a VCD trace file, returning zero on
//!   success.
//!
//! The port table lists a getter and a setter for every port, in the order
//! declared below, followed by `eval`, `final` and `trace_dump`. Single-bit
//! ports travel as `u32`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use super::{Error, Result};

pub trait Port: Copy {
    type Raw: Copy;

    fn from_raw(raw: Self::Raw) -> Self;
    fn into_raw(self) -> Self::Raw;
}

impl Port for bool {
    type Raw = u32;

    fn from_raw(raw: u32) -> bool { raw != 0 }
    fn into_raw(self) -> u32 { self as u32 }
}

impl Port for u32 {
    type Raw = u32;

    fn from_raw(raw: u32) -> u32 { raw }
    fn into_raw(self) -> u32 { self }
}

impl Port for u64 {
    type Raw = u64;

    fn from_raw(raw: u64) -> u64 { raw }
    fn into_raw(self) -> u64 { self }
}

pub trait ModelEnv {
    /// Name of the top-level module this table describes.
    const TOP: &'static str;

    fn eval(&self);
    fn finish(&self);
    fn trace_dump(&self, time: u64);
}

/// A loaded model, accessed through its port table.
pub struct Model<'lib, E: 'lib> {
    env: &'lib E,
}

impl<'lib, E: ModelEnv> Model<'lib, E> {
    /// # Safety
    ///
    /// Every function in `env` must stay callable for `'lib` and must not be
    /// called from more than one thread.
    pub unsafe fn from_env(env: &'lib E) -> Model<'lib, E> {
        Model { env }
    }

    pub fn eval(&mut self) {
        self.env.eval()
    }

    pub fn finish(&mut self) {
        self.env.finish()
    }

    pub fn trace_dump(&mut self, time: u64) {
        self.env.trace_dump(time)
    }
}

macro_rules! model_env {
    (
        $(#[$attr:meta])*
        pub struct $name:ident($top:expr) {
            $( $port:ident / $get:ident / $set:ident : $ty:ty; )*
        }
    ) => {
        $(#[$attr])*
        #[repr(C)]
        pub struct $name {
            $(
                pub $get: extern "C" fn() -> <$ty as Port>::Raw,
                pub $set: extern "C" fn(<$ty as Port>::Raw),
            )*
            pub eval: extern "C" fn(),
            pub final_: extern "C" fn(),
            pub trace_dump: extern "C" fn(u64),
        }

        impl ModelEnv for $name {
            const TOP: &'static str = $top;

            fn eval(&self) { (self.eval)() }
            fn finish(&self) { (self.final_)() }
            fn trace_dump(&self, time: u64) { (self.trace_dump)(time) }
        }

        impl<'lib> Model<'lib, $name> {
            $(
                pub fn $port(&self) -> $ty {
                    <$ty as Port>::from_raw((self.env.$get)())
                }

                pub fn $set(&mut self, value: $ty) {
                    (self.env.$set)(value.into_raw())
                }
            )*
        }
    }
}

model_env! {
    /// The complete system: CPU, program ROM port, LEDs and the DDR3
    /// controller's Avalon-MM master.
    pub struct XenowingEnv("xenowing") {
        reset_n / get_reset_n / set_reset_n: bool;
        clk / get_clk / set_clk: bool;
        program_rom_addr / get_program_rom_addr / set_program_rom_addr: u32;
        program_rom_q / get_program_rom_q / set_program_rom_q: u32;
        leds / get_leds / set_leds: u32;
        avl_ready / get_avl_ready / set_avl_ready: bool;
        avl_burstbegin / get_avl_burstbegin / set_avl_burstbegin: bool;
        avl_addr / get_avl_addr / set_avl_addr: u32;
        avl_rdata_valid / get_avl_rdata_valid / set_avl_rdata_valid: bool;
        avl_rdata / get_avl_rdata / set_avl_rdata: u64;
        avl_wdata / get_avl_wdata / set_avl_wdata: u64;
        avl_be / get_avl_be / set_avl_be: u32;
        avl_read_req / get_avl_read_req / set_avl_read_req: bool;
        avl_write_req / get_avl_write_req / set_avl_write_req: bool;
        avl_size / get_avl_size / set_avl_size: u32;
    }
}

model_env! {
    /// The DDR3 test design: a traffic generator on the Avalon-MM port plus
    /// the controller's status outputs. `leds_n` is active low.
    pub struct Ddr3TestEnv("ddr3_test") {
        reset_n / get_reset_n / set_reset_n: bool;
        clk / get_clk / set_clk: bool;
        avl_ready / get_avl_ready / set_avl_ready: bool;
        avl_burstbegin / get_avl_burstbegin / set_avl_burstbegin: bool;
        avl_addr / get_avl_addr / set_avl_addr: u32;
        avl_rdata_valid / get_avl_rdata_valid / set_avl_rdata_valid: bool;
        avl_rdata / get_avl_rdata / set_avl_rdata: u64;
        avl_wdata / get_avl_wdata / set_avl_wdata: u64;
        avl_be / get_avl_be / set_avl_be: u32;
        avl_read_req / get_avl_read_req / set_avl_read_req: bool;
        avl_write_req / get_avl_write_req / set_avl_write_req: bool;
        avl_size / get_avl_size / set_avl_size: u32;
        ddr3_init_done / get_ddr3_init_done / set_ddr3_init_done: bool;
        ddr3_cal_success / get_ddr3_cal_success / set_ddr3_cal_success: bool;
        ddr3_cal_fail / get_ddr3_cal_fail / set_ddr3_cal_fail: bool;
        leds_n / get_leds_n / set_leds_n: u32;
    }
}

const TOP_SYMBOL: &str = "xw_model_top";
const ENV_SYMBOL: &str = "xw_model_env";
const TRACE_SYMBOL: &str = "xw_model_trace";

fn symbol_name(name: &str) -> Vec<u8> {
    let mut bytes = name.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

pub struct ModelLibrary {
    library: Library,
    path: PathBuf,
}

impl ModelLibrary {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ModelLibrary> {
        let path = path.as_ref().to_owned();
        // Loading runs the library's initializers; a model built for xw
        // has none beyond the C++ runtime's.
        let library = unsafe { Library::new(&path) }
            .map_err(|source| Error::Load { path: path.clone(), source })?;
        info!("loaded simulation model {}", path.display());
        Ok(ModelLibrary { library, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    unsafe fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>> {
        self.library.get(&symbol_name(name))
            .map_err(|source| Error::Symbol { symbol: name, source })
    }

    /// Name of the top-level module the library was built from.
    pub fn top(&self) -> Result<String> {
        unsafe {
            let top = self.symbol::<unsafe extern "C" fn() -> *const c_char>(TOP_SYMBOL)?;
            let name = top();
            if name.is_null() {
                return Err(Error::NullEnv)
            }
            Ok(CStr::from_ptr(name).to_string_lossy().into_owned())
        }
    }

    pub fn model<E: ModelEnv>(&self) -> Result<Model<'_, E>> {
        let top = self.top()?;
        if top != E::TOP {
            return Err(Error::WrongTop { expected: E::TOP, found: top })
        }

        unsafe {
            let env = self.symbol::<unsafe extern "C" fn() -> *const E>(ENV_SYMBOL)?;
            let env = env();
            if env.is_null() {
                return Err(Error::NullEnv)
            }
            debug!("{}: port table at {:p}", top, env);
            Ok(Model::from_env(&*env))
        }
    }

    /// Starts writing every subsequent `trace_dump` to a VCD file.
    pub fn open_trace(&self, path: &Path) -> Result<()> {
        let trace_error = || Error::Trace { path: path.to_owned() };
        let c_path = CString::new(path.to_string_lossy().into_owned())
            .map_err(|_| trace_error())?;
        let status = unsafe {
            let open = self.symbol::<unsafe extern "C" fn(*const c_char) -> c_int>(TRACE_SYMBOL)?;
            open(c_path.as_ptr())
        };
        if status != 0 {
            return Err(trace_error())
        }
        info!("tracing to {}", path.display());
        Ok(())
    }
}
