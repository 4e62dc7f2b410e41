extern crate build_xw;

use std::env;

const DEFAULT_PROGRAM: &str = "program.bin";

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    println!("cargo:rustc-link-search={}", manifest_dir);
    println!("cargo:rustc-link-arg-bins=-Tlink.ld");
    build_xw::rerun_if_changed("link.ld");

    build_xw::rerun_if_env_changed("XW_PROGRAM");
    let program = env::var("XW_PROGRAM").unwrap_or_else(|_| DEFAULT_PROGRAM.to_owned());
    println!("cargo:rustc-env=XW_PROGRAM={}", program);
}
