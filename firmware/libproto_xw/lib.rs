#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate crc;
extern crate io;
#[macro_use]
extern crate log;

pub mod console;
pub mod boot_proto;
pub mod monitor_proto;
