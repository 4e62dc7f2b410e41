extern crate cc;

use std::env;
use std::path::Path;

fn main() {
    let target = env::var("TARGET").unwrap();
    if !target.starts_with("riscv32") {
        return
    }

    let entry_path = "riscv32/entry.S";

    println!("cargo:rerun-if-changed={}", entry_path);
    cc::Build::new()
        .flag("-march=rv32i")
        .flag("-mabi=ilp32")
        .file(Path::new(entry_path))
        .compile("entry");
}
