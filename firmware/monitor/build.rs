extern crate build_xw;

use std::env;
use std::path::Path;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let board_dir = Path::new(&manifest_dir).join("../libboard_xw");
    println!("cargo:rustc-link-search={}", board_dir.display());
    println!("cargo:rustc-link-arg-bins=-Tprogram.ld");
    build_xw::rerun_if_changed(board_dir.join("program.ld"));
}
